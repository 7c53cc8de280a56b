#[cfg(test)]
mod tests {
    use crate::models::{StaffChoice, StaffTimeSlot, TimeRange};
    use crate::selection::{FlowOrder, SelectionError, SelectionState, Step};
    use chrono::{NaiveDate, NaiveDateTime};
    use harmony_common::StaffId;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn slot(start: &str, end: &str) -> TimeRange {
        TimeRange::parse(start, end).unwrap()
    }

    fn staff_a() -> StaffChoice {
        StaffChoice::Specific(StaffId(1))
    }

    fn staff_b() -> StaffChoice {
        StaffChoice::Specific(StaffId(2))
    }

    fn availability() -> Vec<StaffTimeSlot> {
        vec![
            StaffTimeSlot {
                staff_id: StaffId(1),
                staff_name: "A".to_string(),
                slots: vec![slot("09:00", "09:30"), slot("11:00", "11:30")],
            },
            StaffTimeSlot {
                staff_id: StaffId(2),
                staff_name: "B".to_string(),
                slots: vec![slot("14:00", "14:30")],
            },
        ]
    }

    const TODAY: &str = "2025-06-01";

    #[test]
    fn test_staff_first_walkthrough() {
        let mut state = SelectionState::new(FlowOrder::StaffFirst);
        assert_eq!(state.active_step(), Step::Staff);
        assert!(state.is_enabled(Step::Staff));
        assert!(!state.is_enabled(Step::Date));
        assert!(!state.is_enabled(Step::Time));

        state.select_staff(staff_a()).unwrap();
        assert_eq!(state.active_step(), Step::Date);
        assert!(state.is_enabled(Step::Date));

        state.select_date(date("2025-06-02"), date(TODAY)).unwrap();
        assert_eq!(state.active_step(), Step::Time);

        state
            .select_time_slot(slot("09:00", "09:30"), &availability(), at("2025-06-01 10:00"))
            .unwrap();
        assert!(state.is_complete());
        assert_eq!(state.active_step(), Step::Time);
    }

    #[test]
    fn test_date_first_walkthrough() {
        let mut state = SelectionState::new(FlowOrder::DateFirst);
        assert_eq!(state.active_step(), Step::Date);
        assert!(!state.is_enabled(Step::Staff));

        state.select_date(date("2025-06-02"), date(TODAY)).unwrap();
        assert_eq!(state.active_step(), Step::Staff);

        state.select_staff(StaffChoice::Any).unwrap();
        assert_eq!(state.active_step(), Step::Time);

        state
            .select_time_slot(slot("09:00", "09:30"), &availability(), at("2025-06-01 10:00"))
            .unwrap();
        assert!(state.is_complete());
        // The choice stays "any" until submission resolves it
        assert_eq!(state.staff(), Some(StaffChoice::Any));
    }

    #[test]
    fn test_changing_staff_clears_date_and_time() {
        let mut state = SelectionState::new(FlowOrder::StaffFirst);
        state.select_staff(staff_a()).unwrap();
        state.select_date(date("2025-06-02"), date(TODAY)).unwrap();
        state
            .select_time_slot(slot("11:00", "11:30"), &availability(), at("2025-06-01 10:00"))
            .unwrap();

        state.select_staff(staff_b()).unwrap();
        assert_eq!(state.staff(), Some(staff_b()));
        assert_eq!(state.selected_date(), None);
        assert_eq!(state.time_slot(), None);
        assert_eq!(state.active_step(), Step::Date);
    }

    #[test]
    fn test_changing_date_clears_staff_and_time_in_date_first() {
        let mut state = SelectionState::new(FlowOrder::DateFirst);
        state.select_date(date("2025-06-02"), date(TODAY)).unwrap();
        state.select_staff(staff_b()).unwrap();
        state
            .select_time_slot(slot("14:00", "14:30"), &availability(), at("2025-06-01 10:00"))
            .unwrap();

        state.select_date(date("2025-06-03"), date(TODAY)).unwrap();
        assert_eq!(state.selected_date(), Some(date("2025-06-03")));
        assert_eq!(state.staff(), None);
        assert_eq!(state.time_slot(), None);
        assert_eq!(state.active_step(), Step::Staff);
    }

    #[test]
    fn test_changing_date_clears_time_in_staff_first() {
        let mut state = SelectionState::new(FlowOrder::StaffFirst);
        state.select_staff(staff_a()).unwrap();
        state.select_date(date("2025-06-02"), date(TODAY)).unwrap();
        state
            .select_time_slot(slot("09:00", "09:30"), &availability(), at("2025-06-01 10:00"))
            .unwrap();

        state.select_date(date("2025-06-03"), date(TODAY)).unwrap();
        assert_eq!(state.staff(), Some(staff_a()));
        assert_eq!(state.time_slot(), None);
    }

    #[test]
    fn test_reselecting_same_value_keeps_downstream() {
        let mut state = SelectionState::new(FlowOrder::StaffFirst);
        state.select_staff(staff_a()).unwrap();
        state.select_date(date("2025-06-02"), date(TODAY)).unwrap();
        state
            .select_time_slot(slot("09:00", "09:30"), &availability(), at("2025-06-01 10:00"))
            .unwrap();
        state.activate(Step::Staff).unwrap();

        state.select_staff(staff_a()).unwrap();
        assert_eq!(state.selected_date(), Some(date("2025-06-02")));
        assert_eq!(state.time_slot(), Some(slot("09:00", "09:30")));
        assert_eq!(state.active_step(), Step::Date);
    }

    #[test]
    fn test_past_date_is_rejected_without_change() {
        let mut state = SelectionState::new(FlowOrder::DateFirst);
        state.select_date(date("2025-06-02"), date(TODAY)).unwrap();
        let before = state.clone();

        let result = state.select_date(date("2025-05-31"), date(TODAY));
        assert_eq!(
            result,
            Err(SelectionError::PastDate {
                date: date("2025-05-31")
            })
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_today_is_not_a_past_date() {
        let mut state = SelectionState::new(FlowOrder::DateFirst);
        assert!(state.select_date(date(TODAY), date(TODAY)).is_ok());
    }

    #[test]
    fn test_locked_steps_are_rejected() {
        let mut state = SelectionState::new(FlowOrder::StaffFirst);
        let before = state.clone();
        assert_eq!(
            state.select_date(date("2025-06-02"), date(TODAY)),
            Err(SelectionError::StepLocked { step: Step::Date })
        );
        assert_eq!(
            state.activate(Step::Time),
            Err(SelectionError::StepLocked { step: Step::Time })
        );
        assert_eq!(
            state.select_time_slot(slot("09:00", "09:30"), &availability(), at("2025-06-01 10:00")),
            Err(SelectionError::DateMissing)
        );
        assert_eq!(state, before);

        let mut date_first = SelectionState::new(FlowOrder::DateFirst);
        assert_eq!(
            date_first.select_staff(staff_a()),
            Err(SelectionError::StepLocked { step: Step::Staff })
        );
    }

    #[test]
    fn test_time_slot_must_be_offered_and_not_elapsed() {
        let mut state = SelectionState::new(FlowOrder::StaffFirst);
        state.select_staff(staff_a()).unwrap();
        state.select_date(date(TODAY), date(TODAY)).unwrap();
        let now = at("2025-06-01 10:00");

        // Started already
        assert_eq!(
            state.select_time_slot(slot("09:00", "09:30"), &availability(), now),
            Err(SelectionError::SlotNotOffered {
                slot: slot("09:00", "09:30")
            })
        );
        // Belongs to staff B
        assert_eq!(
            state.select_time_slot(slot("14:00", "14:30"), &availability(), now),
            Err(SelectionError::SlotNotOffered {
                slot: slot("14:00", "14:30")
            })
        );
        assert_eq!(state.time_slot(), None);

        state
            .select_time_slot(slot("11:00", "11:30"), &availability(), now)
            .unwrap();
        assert_eq!(state.time_slot(), Some(slot("11:00", "11:30")));
    }

    #[test]
    fn test_any_staff_with_nobody_left_cannot_pick_a_slot() {
        let mut state = SelectionState::new(FlowOrder::DateFirst);
        state.select_date(date(TODAY), date(TODAY)).unwrap();
        state.select_staff(StaffChoice::Any).unwrap();

        let result =
            state.select_time_slot(slot("14:00", "14:30"), &availability(), at("2025-06-01 20:00"));
        assert_eq!(result, Err(SelectionError::NoStaffAvailable));
    }

    #[test]
    fn test_clear_from_returns_to_enabled_step() {
        let mut state = SelectionState::new(FlowOrder::StaffFirst);
        state.select_staff(staff_a()).unwrap();
        state.select_date(date("2025-06-02"), date(TODAY)).unwrap();

        state.clear_from(Step::Date);
        assert_eq!(state.selected_date(), None);
        assert_eq!(state.staff(), Some(staff_a()));
        assert_eq!(state.active_step(), Step::Date);

        let mut date_first = SelectionState::new(FlowOrder::DateFirst);
        date_first.select_date(date("2025-06-02"), date(TODAY)).unwrap();
        date_first.select_staff(staff_a()).unwrap();
        date_first.clear_from(Step::Date);
        assert_eq!(date_first.staff(), None);
        assert_eq!(date_first.active_step(), Step::Date);
    }

    #[test]
    fn test_preselected_date_enables_staff_in_date_first() {
        let state = SelectionState::with_date(FlowOrder::DateFirst, date(TODAY));
        assert_eq!(state.active_step(), Step::Date);
        assert!(state.is_enabled(Step::Staff));
        assert!(!state.is_complete());
    }

    #[test]
    fn test_preselected_date_is_not_held_while_date_is_locked() {
        let mut state = SelectionState::with_date(FlowOrder::StaffFirst, date(TODAY));
        assert_eq!(state, SelectionState::new(FlowOrder::StaffFirst));
        assert_eq!(state.selected_date(), None);

        state.select_staff(staff_a()).unwrap();
        assert_eq!(state.active_step(), Step::Date);
        assert_eq!(state.selected_date(), None);
    }
}
