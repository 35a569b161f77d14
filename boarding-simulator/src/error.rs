use std::fmt;

use crate::cabin::SeatClassKind;

/// Configuration errors that make it impossible to build a cabin layout.
///
/// These are fatal: no partial layout is ever produced when one of them is
/// returned.
#[derive(Debug)]
pub enum LayoutError {
    /// The embedded or supplied cabin document is not valid TOML.
    Parse(toml::de::Error),
    /// Classes with rows disagree on the number of aisles.
    AisleMismatch { counts: Vec<(SeatClassKind, usize)> },
    /// Aisle count is outside the supported range of one or two.
    InvalidAisleCount(usize),
    /// No class has any rows.
    NoSeatingClass,
    /// The same class appears twice in the cabin definition.
    DuplicateClass(SeatClassKind),
    /// A seat layout contains something other than letters and whitespace.
    InvalidSeatLayout { class: SeatClassKind, layout: String },
    /// The row correction loop went a full pass without being able to adjust.
    RowRangeUnreachable { total: u32, min: u32, max: u32 },
    /// Aisles and the gate must be wider than one passenger.
    InvalidGatewaySize(f32),
    /// Passengers are too small for the fixed wall and outline widths: a
    /// seated passenger blocks the leg room of its row.
    CabinTooSmall {
        class: SeatClassKind,
        diameter: f32,
    },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::Parse(e) => write!(f, "Invalid cabin definition: {e}"),
            LayoutError::AisleMismatch { counts } => {
                write!(f, "Aisle count differs between classes with rows:")?;
                for (class, count) in counts {
                    write!(f, " {class}={count}")?;
                }
                Ok(())
            }
            LayoutError::InvalidAisleCount(n) => write!(
                f,
                "Number of aisles is {n}; the minimum is one and the maximum is two"
            ),
            LayoutError::NoSeatingClass => write!(f, "No class has any rows"),
            LayoutError::DuplicateClass(class) => {
                write!(f, "{class} class is defined more than once")
            }
            LayoutError::InvalidSeatLayout { class, layout } => {
                write!(f, "Seat layout {layout:?} of {class} class is not valid")
            }
            LayoutError::RowRangeUnreachable { total, min, max } => write!(
                f,
                "Cannot bring {total} rows into the range [{min}, {max}] within the per-class limits"
            ),
            LayoutError::InvalidGatewaySize(size) => write!(
                f,
                "Gateway size is {size}; it must be greater than one passenger diameter"
            ),
            LayoutError::CabinTooSmall { class, diameter } => write!(
                f,
                "Passengers of {diameter:.2} px cannot pass seated passengers in {class} class; the window is too narrow"
            ),
        }
    }
}

impl std::error::Error for LayoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LayoutError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for LayoutError {
    fn from(e: toml::de::Error) -> Self {
        LayoutError::Parse(e)
    }
}
