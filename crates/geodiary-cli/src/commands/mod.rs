//! Command implementations.

mod link;
mod list;
mod queue;
mod record;
mod status;
mod sync;

pub use link::cmd_link;
pub use list::cmd_list;
pub use queue::{cmd_clear, cmd_delete};
pub use record::cmd_record;
pub use status::cmd_status;
pub use sync::cmd_sync;
