pub mod enums;
pub mod page;
pub mod role;
pub mod room;
pub mod room_type;
pub mod server;
pub mod server_pool;
pub mod streaming;
pub mod user;

pub use enums::*;
pub use page::*;
pub use role::*;
pub use room::*;
pub use room_type::*;
pub use server::*;
pub use server_pool::*;
pub use streaming::*;
pub use user::*;
