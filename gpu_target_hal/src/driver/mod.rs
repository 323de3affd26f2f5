/// Driver module - the binding between the HAL and a graphics driver

// Module declarations
pub mod graphics_driver;
pub mod capabilities;

// Re-export everything from graphics_driver.rs
pub use graphics_driver::*;
pub use capabilities::*;

// Mock graphics driver for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_driver;
