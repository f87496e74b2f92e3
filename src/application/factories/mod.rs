mod formatter_factory;
mod ports_factory;
mod presenter_factory;

pub use formatter_factory::FormatterFactory;
pub use ports_factory::PortsFactory;
pub use presenter_factory::{PresenterFactory, PresenterType};
