#[cfg(windows)]
pub mod gfx;
#[cfg(windows)]
pub mod os;
pub mod util;
