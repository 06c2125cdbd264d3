//! Decision engine: desired descriptor + observed state -> action.
//!
//! Pure and synchronous. No I/O happens here; fetching and applying belong to
//! the collaborators in [`crate::provider`].

use crate::property::{
    Action, Ensure, ObservedProperty, PropertyDescriptor, ValueComparator, ValueComparison,
};

/// Compares desired and observed state using a caller-supplied value comparator.
pub struct ReconciliationEngine<C = ValueComparison> {
    comparator: C,
}

impl ReconciliationEngine<ValueComparison> {
    /// An engine using exact-match value comparison.
    pub fn new() -> Self {
        Self::with_comparator(ValueComparison::Exact)
    }
}

impl Default for ReconciliationEngine<ValueComparison> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ValueComparator> ReconciliationEngine<C> {
    pub fn with_comparator(comparator: C) -> Self {
        Self { comparator }
    }

    /// Decides what must happen to `observed` to satisfy `desired`.
    ///
    /// Removal ignores `replace`: an absent descriptor always removes an
    /// existing value. `replace = false` only stops overwriting a divergent
    /// value; first-time creation always proceeds.
    pub fn decide(&self, desired: &PropertyDescriptor, observed: &ObservedProperty) -> Action {
        match desired.ensure() {
            Ensure::Absent => match observed.value {
                Some(_) => Action::RemoveToDefault,
                None => Action::NoOp,
            },
            Ensure::Present => {
                // Present descriptors always carry a value.
                let Some(wanted) = desired.value() else {
                    return Action::NoOp;
                };
                match &observed.value {
                    None => Action::SetValue(wanted.clone()),
                    Some(current) if self.comparator.matches(current, wanted) => Action::NoOp,
                    Some(current) => {
                        if desired.replace() {
                            Action::SetValue(wanted.clone())
                        } else {
                            log::debug!(
                                "Property '{}' is '{}' (wanted '{}'); leaving it because replace is false",
                                desired.name(),
                                current,
                                wanted
                            );
                            Action::NoOp
                        }
                    }
                }
            }
        }
    }
}

/// Decides with exact-match comparison.
pub fn decide(desired: &PropertyDescriptor, observed: &ObservedProperty) -> Action {
    ReconciliationEngine::new().decide(desired, observed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::PropertyValue;

    fn no_replace(name: &str, value: impl Into<PropertyValue>) -> PropertyDescriptor {
        PropertyDescriptor::builder(name)
            .value(value)
            .replace(false)
            .build()
            .unwrap()
    }

    #[test]
    fn test_stonith_disabled_overwrites_enabled() {
        let desired = PropertyDescriptor::present("stonith-enabled", "false").unwrap();
        let observed = ObservedProperty::present("stonith-enabled", "true");
        assert_eq!(
            decide(&desired, &observed),
            Action::SetValue(PropertyValue::from("false"))
        );
    }

    #[test]
    fn test_absent_against_absent_is_noop() {
        let desired = PropertyDescriptor::absent("foo").unwrap();
        let observed = ObservedProperty::absent("foo");
        assert_eq!(decide(&desired, &observed), Action::NoOp);
    }

    #[test]
    fn test_absent_removes_existing_value() {
        let desired = PropertyDescriptor::absent("foo").unwrap();
        let observed = ObservedProperty::present("foo", "bar");
        assert_eq!(decide(&desired, &observed), Action::RemoveToDefault);
    }

    #[test]
    fn test_absent_removes_even_without_replace() {
        let desired = PropertyDescriptor::builder("foo")
            .ensure(Ensure::Absent)
            .replace(false)
            .build()
            .unwrap();
        let observed = ObservedProperty::present("foo", "bar");
        assert_eq!(decide(&desired, &observed), Action::RemoveToDefault);
    }

    #[test]
    fn test_no_replace_tolerates_divergence() {
        let desired = no_replace("bar", "10");
        let observed = ObservedProperty::present("bar", "5");
        assert_eq!(decide(&desired, &observed), Action::NoOp);
    }

    #[test]
    fn test_no_replace_still_creates() {
        let desired = no_replace("bar", "10");
        let observed = ObservedProperty::absent("bar");
        assert_eq!(
            decide(&desired, &observed),
            Action::SetValue(PropertyValue::from("10"))
        );
    }

    #[test]
    fn test_matching_value_is_noop() {
        let desired = PropertyDescriptor::present("no-quorum-policy", "stop").unwrap();
        let observed = ObservedProperty::present("no-quorum-policy", "stop");
        assert_eq!(decide(&desired, &observed), Action::NoOp);
    }

    #[test]
    fn test_replace_sets_regardless_of_value_type() {
        let cases: Vec<(PropertyValue, PropertyValue)> = vec![
            (PropertyValue::from(true), PropertyValue::from(false)),
            (PropertyValue::from(10), PropertyValue::from(5)),
            (PropertyValue::from(0.5), PropertyValue::from(1.5)),
            (PropertyValue::from("10"), PropertyValue::from(10)),
            (PropertyValue::from("ignore"), PropertyValue::from("stop")),
        ];

        for (wanted, current) in cases {
            let desired = PropertyDescriptor::present("p", wanted.clone()).unwrap();
            let observed = ObservedProperty::new("p", Some(current.clone()));
            assert_eq!(
                decide(&desired, &observed),
                Action::SetValue(wanted.clone()),
                "wanted {:?}, observed {:?}",
                wanted,
                current
            );
        }
    }

    #[test]
    fn test_no_replace_never_overwrites_any_type() {
        let existing = [
            PropertyValue::from(true),
            PropertyValue::from(7),
            PropertyValue::from("anything"),
        ];
        for current in existing {
            let desired = no_replace("p", 10);
            let observed = ObservedProperty::new("p", Some(current));
            assert_eq!(decide(&desired, &observed), Action::NoOp);
        }
    }

    #[test]
    fn test_rendered_comparator_treats_string_and_integer_alike() {
        let engine = ReconciliationEngine::with_comparator(ValueComparison::Rendered);
        let desired = PropertyDescriptor::present("batch-limit", 10).unwrap();
        let observed = ObservedProperty::present("batch-limit", "10");
        assert_eq!(engine.decide(&desired, &observed), Action::NoOp);

        // Exact comparison sees a divergence.
        assert_eq!(
            decide(&desired, &observed),
            Action::SetValue(PropertyValue::from(10))
        );
    }

    #[test]
    fn test_custom_comparator() {
        let engine = ReconciliationEngine::with_comparator(
            |o: &PropertyValue, d: &PropertyValue| o.render().eq_ignore_ascii_case(&d.render()),
        );
        let desired = PropertyDescriptor::present("no-quorum-policy", "stop").unwrap();
        let observed = ObservedProperty::present("no-quorum-policy", "STOP");
        assert_eq!(engine.decide(&desired, &observed), Action::NoOp);
    }

    #[test]
    fn test_nan_value_converges_after_one_set() {
        let desired = PropertyDescriptor::present("placement-weight", f64::NAN).unwrap();
        let first = decide(&desired, &ObservedProperty::absent("placement-weight"));
        let Action::SetValue(applied) = first else {
            panic!("expected SetValue, got {:?}", first);
        };

        let observed = ObservedProperty::present("placement-weight", applied);
        assert_eq!(decide(&desired, &observed), Action::NoOp);
    }
}
