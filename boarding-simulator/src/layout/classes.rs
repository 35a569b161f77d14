use std::fmt;

use log::{debug, info};

use crate::{
    cabin::{CabinConfig, SeatClassKind},
    error::LayoutError,
};

/// Seat letters of one row, split into groups by aisles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatLayout {
    groups: Vec<Vec<char>>,
}

impl SeatLayout {
    /// Parses a layout such as `"AB CD EF"`. Any whitespace run is one aisle.
    pub fn parse(source: &str) -> Option<Self> {
        let groups: Vec<Vec<char>> = source
            .split_whitespace()
            .map(|group| group.to_ascii_uppercase().chars().collect())
            .collect();

        let valid = !groups.is_empty()
            && groups
                .iter()
                .flatten()
                .all(|c| c.is_ascii_alphabetic())
            && groups.iter().map(Vec::len).sum::<usize>() <= 26;

        valid.then_some(SeatLayout { groups })
    }

    pub fn groups(&self) -> &[Vec<char>] {
        &self.groups
    }

    pub fn seats(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    pub fn aisles(&self) -> usize {
        self.groups.len() - 1
    }

    /// Letters left to right.
    pub fn letters(&self) -> impl Iterator<Item = char> + '_ {
        self.groups.iter().flatten().copied()
    }

    /// Zero-based position of a letter from the left.
    pub fn position(&self, letter: char) -> Option<usize> {
        self.letters().position(|c| c == letter)
    }

    pub fn contains(&self, letter: char) -> bool {
        self.position(letter).is_some()
    }

    pub fn is_ascending(&self) -> bool {
        let letters: Vec<char> = self.letters().collect();
        letters.windows(2).all(|w| w[0] < w[1])
    }

    /// Same group shape, letters rewritten as A, B, C... from the left.
    pub fn relabeled(&self) -> Self {
        let mut next = b'A';
        let groups = self
            .groups
            .iter()
            .map(|group| {
                group
                    .iter()
                    .map(|_| {
                        let c = next as char;
                        next += 1;
                        c
                    })
                    .collect()
            })
            .collect();

        SeatLayout { groups }
    }
}

impl fmt::Display for SeatLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, group) in self.groups.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            for c in group {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

/// A cabin class after normalization. Only classes with rows survive.
#[derive(Debug, Clone)]
pub struct SeatClass {
    pub kind: SeatClassKind,
    pub layout: SeatLayout,
    pub rows: u32,
    /// Leg room in passenger diameters.
    pub leg_room: f32,
    /// Seat depth in passenger diameters.
    pub seat_depth: f32,
    /// Row number of the first row of this class (1-based, cabin-wide).
    pub first_row: u32,
}

impl SeatClass {
    pub fn last_row(&self) -> u32 {
        self.first_row + self.rows - 1
    }

    pub fn contains_row(&self, row: u32) -> bool {
        (self.first_row..=self.last_row()).contains(&row)
    }
}

/// A corrective change applied to the cabin definition.
#[derive(Debug, Clone, PartialEq)]
pub enum Adjustment {
    RowRemoved {
        class: SeatClassKind,
        rows: u32,
        total: u32,
    },
    RowAdded {
        class: SeatClassKind,
        rows: u32,
        total: u32,
    },
    LettersRelabeled {
        class: SeatClassKind,
        from: String,
        to: String,
    },
    LayoutNarrowed {
        class: SeatClassKind,
        from: String,
        to: String,
    },
    LayoutAltered {
        class: SeatClassKind,
        from: String,
        to: String,
    },
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Adjustment::RowRemoved { class, rows, total } => write!(
                f,
                "1 row subtracted from {class} class. There are now {rows} rows in {class}, and {total} rows total."
            ),
            Adjustment::RowAdded { class, rows, total } => write!(
                f,
                "1 row added to {class} class. There are now {rows} rows in {class}, and {total} rows total."
            ),
            Adjustment::LettersRelabeled { class, from, to } => write!(
                f,
                "Seat letters of {class} class are not in order; \"{from}\" relabeled as \"{to}\"."
            ),
            Adjustment::LayoutNarrowed { class, from, to } => write!(
                f,
                "{class} class has more seats per row than the rear class; \"{from}\" changed to \"{to}\"."
            ),
            Adjustment::LayoutAltered { class, from, to } => write!(
                f,
                "Seat layout of {class} class has been altered from \"{from}\" to \"{to}\"."
            ),
        }
    }
}

/// Cabin classes ready for layout derivation.
#[derive(Debug, Clone)]
pub struct NormalizedCabin {
    /// Classes with rows, front to back.
    pub classes: Vec<SeatClass>,
    pub aisles: usize,
    pub exits: usize,
    pub adjustments: Vec<Adjustment>,
}

impl NormalizedCabin {
    pub fn total_rows(&self) -> u32 {
        self.classes.iter().map(|c| c.rows).sum()
    }
}

struct Draft {
    kind: SeatClassKind,
    layout: Option<SeatLayout>,
    rows: u32,
    leg_room: f32,
    seat_depth: f32,
}

/// Validates the cabin definition and applies the corrective rules.
pub fn normalize(cabin: &CabinConfig) -> Result<NormalizedCabin, LayoutError> {
    if cabin.gateway_size.is_nan() || cabin.gateway_size <= 1.0 {
        return Err(LayoutError::InvalidGatewaySize(cabin.gateway_size));
    }

    let mut configs: Vec<_> = cabin.classes.iter().collect();
    configs.sort_by_key(|c| c.kind);
    if let Some(w) = configs.windows(2).find(|w| w[0].kind == w[1].kind) {
        return Err(LayoutError::DuplicateClass(w[0].kind));
    }

    let mut drafts = Vec::with_capacity(configs.len());
    for config in configs {
        let layout = SeatLayout::parse(&config.seat_layout);
        if layout.is_none() && config.rows > 0 {
            return Err(LayoutError::InvalidSeatLayout {
                class: config.kind,
                layout: config.seat_layout.clone(),
            });
        }
        drafts.push(Draft {
            kind: config.kind,
            layout,
            rows: config.rows,
            leg_room: config.leg_room,
            seat_depth: config.seat_depth,
        });
    }

    let aisles = check_aisles(&drafts)?;
    let exits = cabin.exit_count();
    if exits as i32 != cabin.exits {
        debug!("exit count {} clamped to {exits}", cabin.exits);
    }
    let mut adjustments = Vec::new();

    clamp_rows(cabin, &mut drafts, &mut adjustments)?;

    let mut classes: Vec<SeatClass> = drafts
        .into_iter()
        .filter(|d| d.rows > 0)
        .filter_map(|d| {
            Some(SeatClass {
                kind: d.kind,
                layout: d.layout?,
                rows: d.rows,
                leg_room: d.leg_room,
                seat_depth: d.seat_depth,
                first_row: 0,
            })
        })
        .collect();

    fix_layouts(&mut classes, &mut adjustments);

    let mut next_row = 1;
    for class in &mut classes {
        class.first_row = next_row;
        next_row += class.rows;
    }

    if adjustments.is_empty() {
        info!("No changes to number of rows per section or seat layout!");
    }
    for class in &classes {
        info!(
            "{:>16}: \"{}\" x {} rows",
            class.kind.to_string(),
            class.layout,
            class.rows
        );
    }

    Ok(NormalizedCabin {
        classes,
        aisles,
        exits,
        adjustments,
    })
}

fn check_aisles(drafts: &[Draft]) -> Result<usize, LayoutError> {
    let counts: Vec<(SeatClassKind, usize)> = drafts
        .iter()
        .filter(|d| d.rows > 0)
        .filter_map(|d| Some((d.kind, d.layout.as_ref()?.aisles())))
        .collect();

    let Some(&(_, aisles)) = counts.first() else {
        return Err(LayoutError::NoSeatingClass);
    };
    if counts.iter().any(|&(_, n)| n != aisles) {
        return Err(LayoutError::AisleMismatch { counts });
    }
    if !(1..=2).contains(&aisles) {
        return Err(LayoutError::InvalidAisleCount(aisles));
    }

    Ok(aisles)
}

/// Adds or removes one row at a time, rear class first, until the total is
/// within `[row_min, row_max]`.
fn clamp_rows(
    cabin: &CabinConfig,
    drafts: &mut [Draft],
    adjustments: &mut Vec<Adjustment>,
) -> Result<(), LayoutError> {
    let (min, max) = (cabin.row_min, cabin.row_max);
    let (class_min, class_max) = (cabin.class_row_min, cabin.class_row_max());
    let in_range = |total: u32| (min..=max).contains(&total);
    let mut total: u32 = drafts.iter().map(|d| d.rows).sum();

    while !in_range(total) {
        let mut changed = false;

        for draft in drafts.iter_mut().rev() {
            if total > max {
                if draft.rows <= class_min {
                    continue;
                }
                draft.rows -= 1;
                total -= 1;
                changed = true;
                let adjustment = Adjustment::RowRemoved {
                    class: draft.kind,
                    rows: draft.rows,
                    total,
                };
                info!("{adjustment}");
                adjustments.push(adjustment);
            } else if total < min {
                if draft.rows >= class_max || draft.rows == 0 {
                    continue;
                }
                draft.rows += 1;
                total += 1;
                changed = true;
                let adjustment = Adjustment::RowAdded {
                    class: draft.kind,
                    rows: draft.rows,
                    total,
                };
                info!("{adjustment}");
                adjustments.push(adjustment);
            }

            if in_range(total) {
                break;
            }
        }

        if !changed {
            return Err(LayoutError::RowRangeUnreachable { total, min, max });
        }
    }

    Ok(())
}

fn fix_layouts(classes: &mut [SeatClass], adjustments: &mut Vec<Adjustment>) {
    for class in classes.iter_mut() {
        if !class.layout.is_ascending() {
            let relabeled = class.layout.relabeled();
            let adjustment = Adjustment::LettersRelabeled {
                class: class.kind,
                from: class.layout.to_string(),
                to: relabeled.to_string(),
            };
            info!("{adjustment}");
            adjustments.push(adjustment);
            class.layout = relabeled;
        }
    }

    let Some(rear_seats) = classes.last().map(|c| c.layout.seats()) else {
        return;
    };

    let too_wide = classes.iter().any(|c| c.layout.seats() > rear_seats);
    let smallest = classes
        .iter()
        .min_by_key(|c| c.layout.seats())
        .map(|c| c.layout.clone());
    if let Some(smallest) = smallest.filter(|_| too_wide) {
        for class in classes.iter_mut().filter(|c| c.layout.seats() > rear_seats) {
            let adjustment = Adjustment::LayoutNarrowed {
                class: class.kind,
                from: class.layout.to_string(),
                to: smallest.to_string(),
            };
            info!("{adjustment}");
            adjustments.push(adjustment);
            class.layout = smallest.clone();
        }
    }

    for i in (1..classes.len()).rev() {
        if classes[i - 1].layout.seats() > classes[i].layout.seats() {
            let layout = classes[i].layout.clone();
            let adjustment = Adjustment::LayoutAltered {
                class: classes[i - 1].kind,
                from: classes[i - 1].layout.to_string(),
                to: layout.to_string(),
            };
            info!("{adjustment}");
            adjustments.push(adjustment);
            classes[i - 1].layout = layout;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cabin(source: &str) -> CabinConfig {
        CabinConfig::from_toml(source).unwrap()
    }

    fn seats_per_row(normalized: &NormalizedCabin) -> Vec<usize> {
        normalized
            .classes
            .iter()
            .map(|c| c.layout.seats())
            .collect()
    }

    #[test]
    fn test_parse_layout() {
        let layout = SeatLayout::parse("  ab  cd ef ").unwrap();
        assert_eq!(layout.to_string(), "AB CD EF");
        assert_eq!(layout.seats(), 6);
        assert_eq!(layout.aisles(), 2);
        assert_eq!(layout.position('D'), Some(3));

        assert!(SeatLayout::parse("A1 B").is_none());
        assert!(SeatLayout::parse("   ").is_none());
    }

    #[test]
    fn test_relabel() {
        let layout = SeatLayout::parse("BA DC").unwrap();
        assert!(!layout.is_ascending());
        assert_eq!(layout.relabeled().to_string(), "AB CD");

        let duplicated = SeatLayout::parse("AA B").unwrap();
        assert!(!duplicated.is_ascending());
    }

    #[test]
    fn test_default_cabin_unchanged() {
        let normalized = normalize(&CabinConfig::default_cabin().unwrap()).unwrap();

        assert!(normalized.adjustments.is_empty());
        assert_eq!(normalized.aisles, 2);
        assert_eq!(normalized.total_rows(), 35);
        assert_eq!(seats_per_row(&normalized), vec![4, 4, 6, 6]);
        assert_eq!(normalized.classes[1].first_row, 6);
        assert_eq!(normalized.classes[3].last_row(), 35);
    }

    #[test]
    fn test_aisle_mismatch() {
        let result = normalize(&cabin(
            r#"
            [[classes]]
            kind = "business"
            seat_layout = "AB CD"
            rows = 5
            leg_room = 1.8
            seat_depth = 1.8

            [[classes]]
            kind = "economy"
            seat_layout = "AB CD EF"
            rows = 20
            leg_room = 1.6
            seat_depth = 1.6
            "#,
        ));

        assert!(matches!(result, Err(LayoutError::AisleMismatch { .. })));
    }

    #[test]
    fn test_aisle_mismatch_ignores_empty_classes() {
        let normalized = normalize(&cabin(
            r#"
            [[classes]]
            kind = "first"
            seat_layout = "A B C D"
            rows = 0
            leg_room = 2.0
            seat_depth = 2.0

            [[classes]]
            kind = "economy"
            seat_layout = "ABC DEF"
            rows = 20
            leg_room = 1.6
            seat_depth = 1.6
            "#,
        ))
        .unwrap();

        assert_eq!(normalized.aisles, 1);
        assert_eq!(normalized.classes.len(), 1);
    }

    #[test]
    fn test_invalid_aisle_count() {
        let result = normalize(&cabin(
            r#"
            [[classes]]
            kind = "economy"
            seat_layout = "AB CD EF GH"
            rows = 20
            leg_room = 1.6
            seat_depth = 1.6
            "#,
        ));
        assert!(matches!(result, Err(LayoutError::InvalidAisleCount(3))));

        let result = normalize(&cabin(
            r#"
            [[classes]]
            kind = "economy"
            seat_layout = "ABCDEF"
            rows = 20
            leg_room = 1.6
            seat_depth = 1.6
            "#,
        ));
        assert!(matches!(result, Err(LayoutError::InvalidAisleCount(0))));
    }

    #[test]
    fn test_duplicate_and_empty() {
        let result = normalize(&cabin(
            r#"
            [[classes]]
            kind = "economy"
            seat_layout = "ABC DEF"
            rows = 10
            leg_room = 1.6
            seat_depth = 1.6

            [[classes]]
            kind = "economy"
            seat_layout = "ABC DEF"
            rows = 10
            leg_room = 1.6
            seat_depth = 1.6
            "#,
        ));
        assert!(matches!(
            result,
            Err(LayoutError::DuplicateClass(SeatClassKind::Economy))
        ));

        let result = normalize(&cabin(
            r#"
            [[classes]]
            kind = "economy"
            seat_layout = "ABC DEF"
            rows = 0
            leg_room = 1.6
            seat_depth = 1.6
            "#,
        ));
        assert!(matches!(result, Err(LayoutError::NoSeatingClass)));
    }

    #[test]
    fn test_gateway_wider_than_passenger() {
        let mut config = CabinConfig::default_cabin().unwrap();

        config.gateway_size = 1.0;
        assert!(matches!(
            normalize(&config),
            Err(LayoutError::InvalidGatewaySize(size)) if size == 1.0
        ));

        config.gateway_size = f32::NAN;
        assert!(matches!(
            normalize(&config),
            Err(LayoutError::InvalidGatewaySize(_))
        ));

        config.gateway_size = 1.2;
        assert!(normalize(&config).is_ok());
    }

    #[test]
    fn test_rows_added() {
        let normalized = normalize(&cabin(
            r#"
            row_min = 10

            [[classes]]
            kind = "business"
            seat_layout = "AB CD"
            rows = 2
            leg_room = 1.8
            seat_depth = 1.8

            [[classes]]
            kind = "economy"
            seat_layout = "AB CD"
            rows = 3
            leg_room = 1.6
            seat_depth = 1.6
            "#,
        ))
        .unwrap();

        assert_eq!(normalized.total_rows(), 10);
        assert_eq!(normalized.adjustments.len(), 5);
        // Rear class is visited first in every pass.
        assert_eq!(
            normalized.adjustments[0],
            Adjustment::RowAdded {
                class: SeatClassKind::Economy,
                rows: 4,
                total: 6,
            }
        );
        assert_eq!(normalized.classes[0].rows, 4);
        assert_eq!(normalized.classes[1].rows, 6);
    }

    #[test]
    fn test_rows_respect_class_floor() {
        let normalized = normalize(&cabin(
            r#"
            row_max = 10

            [[classes]]
            kind = "first"
            seat_layout = "A B"
            rows = 3
            leg_room = 2.0
            seat_depth = 2.0

            [[classes]]
            kind = "economy"
            seat_layout = "AB CD"
            rows = 12
            leg_room = 1.6
            seat_depth = 1.6
            "#,
        ))
        .unwrap();

        assert_eq!(normalized.total_rows(), 10);
        assert_eq!(normalized.classes[0].rows, 3);
        assert_eq!(normalized.classes[1].rows, 7);
    }

    #[test]
    fn test_rows_unreachable() {
        let result = normalize(&cabin(
            r#"
            row_max = 4

            [[classes]]
            kind = "first"
            seat_layout = "A B"
            rows = 3
            leg_room = 2.0
            seat_depth = 2.0

            [[classes]]
            kind = "economy"
            seat_layout = "AB CD"
            rows = 3
            leg_room = 1.6
            seat_depth = 1.6
            "#,
        ));

        assert!(matches!(
            result,
            Err(LayoutError::RowRangeUnreachable { total: 6, .. })
        ));
    }

    #[test]
    fn test_layouts_monotonic() {
        let normalized = normalize(&cabin(
            r#"
            [[classes]]
            kind = "first"
            seat_layout = "ABC DEF"
            rows = 5
            leg_room = 2.0
            seat_depth = 2.0

            [[classes]]
            kind = "business"
            seat_layout = "ABC DEF"
            rows = 5
            leg_room = 1.8
            seat_depth = 1.8

            [[classes]]
            kind = "premium_economy"
            seat_layout = "AB CD"
            rows = 5
            leg_room = 1.8
            seat_depth = 1.6

            [[classes]]
            kind = "economy"
            seat_layout = "ABCD EFGH"
            rows = 20
            leg_room = 1.6
            seat_depth = 1.6
            "#,
        ))
        .unwrap();

        let seats = seats_per_row(&normalized);
        assert!(seats.windows(2).all(|w| w[0] <= w[1]), "{seats:?}");
        assert_eq!(seats.last(), seats.iter().max());
        assert_eq!(seats, vec![4, 4, 4, 8]);
        assert_eq!(normalized.adjustments.len(), 2);
    }

    #[test]
    fn test_layouts_narrowed_to_rear() {
        let normalized = normalize(&cabin(
            r#"
            [[classes]]
            kind = "first"
            seat_layout = "AB CD"
            rows = 5
            leg_room = 2.0
            seat_depth = 2.0

            [[classes]]
            kind = "business"
            seat_layout = "ABC DEF"
            rows = 5
            leg_room = 1.8
            seat_depth = 1.8

            [[classes]]
            kind = "economy"
            seat_layout = "BA CDE"
            rows = 20
            leg_room = 1.6
            seat_depth = 1.6
            "#,
        ))
        .unwrap();

        assert_eq!(normalized.classes[2].layout.to_string(), "AB CDE");
        assert_eq!(normalized.classes[1].layout.to_string(), "AB CD");
        assert_eq!(seats_per_row(&normalized), vec![4, 4, 5]);
        assert!(matches!(
            normalized.adjustments[0],
            Adjustment::LettersRelabeled {
                class: SeatClassKind::Economy,
                ..
            }
        ));
    }
}
