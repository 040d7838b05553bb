// Core codec layers: token stream, scalar, structural, and discriminator dispatch.
pub mod dispatch;
pub mod duration;
pub mod error;
pub mod guid;
pub mod primitive;
pub mod reader;
pub mod structural;
pub mod token;
pub mod wire_enum;
pub mod writer;
