pub mod errors;
pub mod events;
pub mod id;
pub mod schedule;
pub mod types;

pub use errors::{ConfigError, StackedError};
pub use events::{Event, EventBus};
pub use id::{new_correlation_id, new_id, MessageId};
pub use schedule::RepeatingTask;
pub use types::{AgentMode, AudioPayload};
