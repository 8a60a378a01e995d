pub mod mock;
pub mod script;
pub mod traits;

// Re-export commonly used types
pub use mock::MockTrigger;
pub use script::ScriptTrigger;
pub use traits::{Trigger, TriggerError, TriggerOutput};
