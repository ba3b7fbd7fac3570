pub mod dispatcher;
pub mod floors;


pub use dispatcher::Dispatcher;
pub use floors::FloorRegistry;
