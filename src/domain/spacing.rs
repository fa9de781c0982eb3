//! Even spacing of events along a band
//!
//! Used for buttonholes: `events` holes of `units_per_event` stitches each,
//! with the gaps before the first and after the last hole sized as a
//! fraction of the gaps between holes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SpacingError {
    #[error("{stitches} stitches cannot hold {buttons} buttonholes of {per_buttonhole} stitches; at least {needed} are needed")]
    TooFewStitches {
        stitches: u32,
        buttons: u32,
        per_buttonhole: u32,
        needed: u32,
    },

    #[error("Button spacing needs at least one button and one stitch per buttonhole")]
    Empty,

    #[error("Cannot space {buttons} buttonholes evenly across {stitches} stitches")]
    Unbalanced { stitches: u32, buttons: u32 },
}

/// Raw spacing before leftover units are handed out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSpacing {
    pub units_before_first_event: u32,
    /// `None` with a single event
    pub units_between_events: Option<u32>,
    pub units_after_last_event: u32,
    pub extra_units: u32,
}

/// Spaces `events` events across `total_units`.
///
/// `before` and `after` scale the end gaps relative to the inner gaps.
/// Returns `None` when the events do not fit.
pub fn space_events(
    total_units: u32,
    events: u32,
    units_per_event: u32,
    mut before: f64,
    mut after: f64,
) -> Option<EventSpacing> {
    if events == 0 || units_per_event == 0 {
        return None;
    }
    let remaining = i64::from(total_units) - i64::from(events) * i64::from(units_per_event);
    let inner_gaps = i64::from(events) - 1;
    let mut intervals = inner_gaps as f64 + before + after;
    if intervals == 0.0 {
        // a single event with no end gaps goes in the middle
        before = 0.5;
        after = 0.5;
        intervals = 1.0;
    }
    let per_interval = remaining as f64 / intervals;

    let mut first = (before * per_interval).floor() as i64;
    let mut last = (after * per_interval).floor() as i64;
    let mut extra = remaining - first - last;
    let mut between = if events > 1 {
        let between = per_interval.floor() as i64;
        extra -= between * inner_gaps;
        Some(between)
    } else {
        None
    };

    if first == 0 && extra > 0 && before > 0.0 {
        first += 1;
        extra -= 1;
    }
    if last == 0 && extra > 0 && after > 0.0 {
        last += 1;
        extra -= 1;
    }
    if let Some(gap) = between.as_mut() {
        if extra > inner_gaps && *gap <= 0 {
            *gap += 1;
            extra -= inner_gaps;
        }
    }

    if first < 0 || last < 0 || extra < 0 || between.is_some_and(|gap| gap < 0) {
        return None;
    }
    Some(EventSpacing {
        units_before_first_event: first as u32,
        units_between_events: between.map(|gap| gap as u32),
        units_after_last_event: last as u32,
        extra_units: extra as u32,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonSpacing {
    pub initial_stitches: u32,
    /// `None` for a single button
    pub stitches_between_buttonholes: Option<u32>,
    pub final_stitches: u32,
    pub stitches_per_buttonhole: u32,
    pub number_of_buttons: u32,
}

impl ButtonSpacing {
    /// Buttonholes after the first
    pub fn number_of_repeats(&self) -> u32 {
        self.number_of_buttons.saturating_sub(1)
    }
}

/// Places buttonholes along a band of `stitches` stitches
#[tracing::instrument(level = "debug")]
pub fn compute_button_spacing(
    stitches: u32,
    per_buttonhole: u32,
    buttons: u32,
) -> Result<ButtonSpacing, SpacingError> {
    if buttons == 0 || per_buttonhole == 0 {
        return Err(SpacingError::Empty);
    }
    // every hole needs a stitch on each side
    let needed = per_buttonhole * buttons + buttons + 1;
    if stitches < needed {
        return Err(SpacingError::TooFewStitches {
            stitches,
            buttons,
            per_buttonhole,
            needed,
        });
    }
    let unbalanced = SpacingError::Unbalanced { stitches, buttons };
    let spacing = space_events(stitches, buttons, per_buttonhole, 0.5, 0.5).ok_or(unbalanced)?;

    let gaps = buttons - 1;
    let mut extra = spacing.extra_units;
    let mut between = spacing.units_between_events;
    if let Some(gap) = between.as_mut() {
        if extra >= gaps {
            *gap += 1;
            extra -= gaps;
        }
    }
    let extra_first = extra / 2;
    let initial_stitches = spacing.units_before_first_event + extra_first;
    let final_stitches = spacing.units_after_last_event + extra - extra_first;
    tracing::debug!(initial_stitches, ?between, final_stitches, "buttonholes spaced");

    if initial_stitches == 0 || final_stitches == 0 || between == Some(0) {
        return Err(SpacingError::Unbalanced { stitches, buttons });
    }
    Ok(ButtonSpacing {
        initial_stitches,
        stitches_between_buttonholes: between,
        final_stitches,
        stitches_per_buttonhole: per_buttonhole,
        number_of_buttons: buttons,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triple(spacing: &ButtonSpacing) -> (u32, Option<u32>, u32) {
        (
            spacing.initial_stitches,
            spacing.stitches_between_buttonholes,
            spacing.final_stitches,
        )
    }

    #[test]
    fn even_band() {
        let spacing = compute_button_spacing(100, 2, 5).unwrap();
        assert_eq!(triple(&spacing), (9, Some(18), 9));
        assert_eq!(spacing.number_of_repeats(), 4);
    }

    #[test]
    fn leftover_goes_to_the_end() {
        let spacing = compute_button_spacing(60, 3, 6).unwrap();
        assert_eq!(triple(&spacing), (3, Some(7), 4));
    }

    #[test]
    fn tightest_band_that_fits() {
        let spacing = compute_button_spacing(13, 2, 4).unwrap();
        assert_eq!(triple(&spacing), (1, Some(1), 1));
        assert_eq!(
            compute_button_spacing(12, 2, 4).unwrap_err(),
            SpacingError::TooFewStitches {
                stitches: 12,
                buttons: 4,
                per_buttonhole: 2,
                needed: 13
            }
        );
    }

    #[test]
    fn single_button_is_centred() {
        let spacing = compute_button_spacing(20, 2, 1).unwrap();
        assert_eq!(triple(&spacing), (9, None, 9));
        assert_eq!(spacing.number_of_repeats(), 0);
    }

    #[test]
    fn no_buttons() {
        assert_eq!(compute_button_spacing(20, 2, 0).unwrap_err(), SpacingError::Empty);
    }

    #[test]
    fn raw_spacing_reports_extra_units() {
        let spacing = space_events(60, 6, 3, 0.5, 0.5).unwrap();
        assert_eq!(spacing.units_before_first_event, 3);
        assert_eq!(spacing.units_between_events, Some(7));
        assert_eq!(spacing.units_after_last_event, 3);
        assert_eq!(spacing.extra_units, 1);
    }

    #[test]
    fn single_event_without_end_gaps_is_centred() {
        let spacing = space_events(11, 1, 1, 0.0, 0.0).unwrap();
        assert_eq!(spacing.units_before_first_event, 5);
        assert_eq!(spacing.units_after_last_event, 5);
        assert_eq!(spacing.units_between_events, None);
    }
}
