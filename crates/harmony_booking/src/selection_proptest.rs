#[cfg(test)]
mod tests {
    use crate::models::{StaffChoice, StaffTimeSlot, TimeRange};
    use crate::selection::{FlowOrder, SelectionState, Step};
    use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
    use harmony_common::StaffId;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Action {
        Staff(Option<u64>),
        Date(i64),
        Slot(usize),
        Activate(Step),
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn now() -> NaiveDateTime {
        today().and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap())
    }

    fn slots() -> Vec<TimeRange> {
        vec![
            TimeRange::parse("09:00", "09:30").unwrap(),
            TimeRange::parse("13:00", "13:30").unwrap(),
            TimeRange::parse("16:00", "16:30").unwrap(),
        ]
    }

    fn availability() -> Vec<StaffTimeSlot> {
        (1..=3)
            .map(|id| StaffTimeSlot {
                staff_id: StaffId(id),
                staff_name: format!("Staff {}", id),
                slots: slots(),
            })
            .collect()
    }

    fn arb_order() -> impl Strategy<Value = FlowOrder> {
        prop_oneof![Just(FlowOrder::StaffFirst), Just(FlowOrder::DateFirst)]
    }

    fn arb_step() -> impl Strategy<Value = Step> {
        prop_oneof![Just(Step::Staff), Just(Step::Date), Just(Step::Time)]
    }

    fn arb_action() -> impl Strategy<Value = Action> {
        prop_oneof![
            prop::option::of(1u64..4).prop_map(Action::Staff),
            (-2i64..4).prop_map(Action::Date),
            (0usize..3).prop_map(Action::Slot),
            arb_step().prop_map(Action::Activate),
        ]
    }

    fn choice(raw: Option<u64>) -> StaffChoice {
        raw.map(|id| StaffChoice::Specific(StaffId(id)))
            .unwrap_or(StaffChoice::Any)
    }

    proptest! {
        // Changing an upstream selection clears everything downstream;
        // rejected actions leave the state as it was.
        #[test]
        fn test_upstream_change_resets_downstream(
            order in arb_order(),
            actions in prop::collection::vec(arb_action(), 0..30),
        ) {
            let mut state = SelectionState::new(order);
            for action in actions {
                let before = state.clone();
                let result = match &action {
                    Action::Staff(raw) => state.select_staff(choice(*raw)),
                    Action::Date(offset) => {
                        state.select_date(today() + Duration::days(*offset), today())
                    }
                    Action::Slot(i) => state.select_time_slot(slots()[*i], &availability(), now()),
                    Action::Activate(step) => state.activate(*step),
                };

                if result.is_err() {
                    prop_assert_eq!(&state, &before);
                    continue;
                }

                let changed = match &action {
                    Action::Staff(_) if before.staff() != state.staff() => Some(Step::Staff),
                    Action::Date(_) if before.selected_date() != state.selected_date() => {
                        Some(Step::Date)
                    }
                    _ => None,
                };
                if let Some(step) = changed {
                    for later in order.after(step) {
                        prop_assert!(!state.has_selection(later), "{:?} survived {:?}", later, action);
                    }
                }

                // Every held selection sits on an enabled step
                for step in order.steps() {
                    if state.has_selection(step) {
                        prop_assert!(state.is_enabled(step));
                    }
                }
                prop_assert!(state.is_enabled(state.active_step()));
            }
        }
    }
}
