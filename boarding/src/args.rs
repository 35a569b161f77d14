/// Default window size in pixels.
pub const DEFAULT_SIZE: (u32, u32) = (1350, 350);
/// Narrowest window the default cabin can be boarded in.
pub const MIN_WIDTH: u32 = 800;

#[derive(Debug, clap::Parser)]
#[command(
    version,
    about = "Simulates passengers boarding an airplane",
    allow_negative_numbers = true
)]
pub struct Args {
    /// Window width in pixels
    pub width: Option<String>,
    /// Window height in pixels
    pub height: Option<String>,
}

impl Args {
    /// Window size. Both values fall back to the default when either one is
    /// missing or not a positive whole number, or the width is below
    /// [`MIN_WIDTH`].
    pub fn window_size(&self) -> (u32, u32) {
        let parse = |value: &Option<String>, min: u32| {
            value
                .as_deref()
                .and_then(|v| v.trim().parse::<u32>().ok())
                .filter(|&v| v >= min)
        };

        match (parse(&self.width, MIN_WIDTH), parse(&self.height, 1)) {
            (Some(width), Some(height)) => (width, height),
            _ => DEFAULT_SIZE,
        }
    }
}
