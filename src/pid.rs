//! C8 — PID Controllers: three discrete PID variants producing a new link
//! setting from setpoint error (§4.8).

use crate::limits::{PID_MIN_UPDATE, TINY};
use crate::types::{ActionAttribute, LinkKind, PidCoeffs, PidHistory};

/// Computes the next link setting for a PID-driven action.
///
/// `set_point`/`control_value` are the most recent comparison operands
/// (§3's `SetPoint`/`ControlValue`), `target_setting` is the link's current
/// setting, `tstep` is the simulation step length in days, and `link_kind`
/// decides whether the result clamps to `[0, 1]` (non-pump) or `[0, inf)`
/// (pump).
///
/// Returns the new setting and the updated PID history (§4.8's shift of
/// `e1`/`e2`/`e3`). History is owned by the action clause, not the rule or
/// the link (DESIGN.md), so callers thread it through explicitly rather
/// than keying off the link.
pub fn update(
    variant: ActionAttribute,
    coeffs: PidCoeffs,
    history: PidHistory,
    set_point: f64,
    control_value: f64,
    target_setting: f64,
    tstep_days: f64,
    link_kind: LinkKind,
) -> (f64, PidHistory) {
    let dt_min = tstep_days * 1440.0;

    let mut e0 = if set_point != 0.0 {
        (set_point - control_value) / set_point
    } else {
        (set_point - control_value) / control_value
    };
    if e0.abs() <= TINY {
        e0 = 0.0;
    }

    // Controller stuck: the error hasn't moved since last step. Reset
    // history rather than let a runaway integral term accumulate.
    let mut history = history;
    if (e0 - history.e1).abs() < 1e-4 {
        history = PidHistory::default();
    }

    let p = e0 - history.e1;
    let i = if coeffs.ki != 0.0 {
        e0 * dt_min / coeffs.ki
    } else {
        0.0
    };

    let mut update = match variant {
        ActionAttribute::Pid => coeffs.kp * (p + i + derivative_classic(coeffs, e0, history, dt_min)),
        ActionAttribute::Pid2 => {
            coeffs.kp * p + i + derivative_classic(coeffs, e0, history, dt_min)
        }
        ActionAttribute::Pid3 => coeffs.kp * p + i + derivative_pid3(coeffs, e0, history, dt_min),
        ActionAttribute::Status | ActionAttribute::Setting => {
            unreachable!("pid::update called with a non-PID action attribute")
        }
    };

    if update.abs() < PID_MIN_UPDATE {
        update = 0.0;
    }

    let mut setting = target_setting + update;
    if setting < 0.0 {
        setting = 0.0;
    }
    if link_kind != LinkKind::Pump && setting > 1.0 {
        setting = 1.0;
    }

    let new_history = match variant {
        ActionAttribute::Pid3 => PidHistory {
            e1: e0,
            e2: history.e1,
            e3: history.e2,
        },
        _ => PidHistory {
            e1: e0,
            e2: history.e1,
            e3: history.e3,
        },
    };

    (setting, new_history)
}

fn derivative_classic(coeffs: PidCoeffs, e0: f64, history: PidHistory, dt_min: f64) -> f64 {
    if dt_min == 0.0 {
        return 0.0;
    }
    coeffs.kd * (e0 - 2.0 * history.e1 + history.e2) / dt_min
}

fn derivative_pid3(coeffs: PidCoeffs, e0: f64, history: PidHistory, dt_min: f64) -> f64 {
    if dt_min == 0.0 {
        return 0.0;
    }
    coeffs.kd * (e0 - (3.0 * history.e1 - 2.0 * history.e2 - history.e3)) / dt_min
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_pid_increases_setting_toward_setpoint() {
        let coeffs = PidCoeffs {
            kp: 1.0,
            ki: 10.0,
            kd: 0.0,
        };
        let (setting, history) = update(
            ActionAttribute::Pid,
            coeffs,
            PidHistory::default(),
            2.0,
            1.0,
            0.0,
            1.0 / 1440.0, // one-minute step
            LinkKind::Orifice,
        );
        assert!(setting > 0.0);
        assert!(history.e1 > 0.0);
    }

    #[test]
    fn setting_clamps_to_unit_interval_for_non_pump_links() {
        let coeffs = PidCoeffs {
            kp: 100.0,
            ki: 0.0,
            kd: 0.0,
        };
        let (setting, _) = update(
            ActionAttribute::Pid2,
            coeffs,
            PidHistory::default(),
            10.0,
            0.1,
            0.9,
            1.0,
            LinkKind::Weir,
        );
        assert_eq!(setting, 1.0);
    }

    #[test]
    fn pump_settings_are_not_clamped_above_one() {
        let coeffs = PidCoeffs {
            kp: 100.0,
            ki: 0.0,
            kd: 0.0,
        };
        let (setting, _) = update(
            ActionAttribute::Pid2,
            coeffs,
            PidHistory::default(),
            10.0,
            0.1,
            0.9,
            1.0,
            LinkKind::Pump,
        );
        assert!(setting > 1.0);
    }

    #[test]
    fn setting_never_goes_negative() {
        let coeffs = PidCoeffs {
            kp: 100.0,
            ki: 0.0,
            kd: 0.0,
        };
        let (setting, _) = update(
            ActionAttribute::Pid,
            coeffs,
            PidHistory::default(),
            0.1,
            10.0,
            0.0,
            1.0,
            LinkKind::Orifice,
        );
        assert_eq!(setting, 0.0);
    }

    #[test]
    fn pid3_maintains_e3_history() {
        let coeffs = PidCoeffs {
            kp: 1.0,
            ki: 5.0,
            kd: 1.0,
        };
        let (_, h1) = update(
            ActionAttribute::Pid3,
            coeffs,
            PidHistory::default(),
            2.0,
            1.0,
            0.2,
            1.0,
            LinkKind::Orifice,
        );
        let (_, h2) = update(ActionAttribute::Pid3, coeffs, h1, 2.0, 1.5, 0.2, 1.0, LinkKind::Orifice);
        assert_ne!(h2.e3, 0.0);
    }

    #[test]
    fn relative_error_below_tiny_is_zeroed() {
        let coeffs = PidCoeffs {
            kp: 1.0,
            ki: 0.0,
            kd: 0.0,
        };
        // e0 = (2.0 - 2.00005) / 2.0 ~ -2.5e-5, below TINY (1e-4)
        let (setting, history) = update(
            ActionAttribute::Pid,
            coeffs,
            PidHistory::default(),
            2.0,
            2.00005,
            0.5,
            1.0,
            LinkKind::Orifice,
        );
        assert_eq!(setting, 0.5);
        assert_eq!(history.e1, 0.0);
    }
}
