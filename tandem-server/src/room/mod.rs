mod relay;
mod relay_command;
mod relay_handle;
mod room;
mod room_registry;

pub use relay::*;
pub use relay_command::*;
pub use relay_handle::*;
pub use room::Member;
pub(crate) use room::Room;
pub(crate) use room_registry::RoomRegistry;
