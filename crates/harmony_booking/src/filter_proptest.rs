#[cfg(test)]
mod tests {
    use crate::filter::{filter_elapsed, resolve_staff, slot_start};
    use crate::models::{StaffChoice, StaffTimeSlot, TimeRange};
    use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
    use harmony_common::StaffId;
    use proptest::prelude::*;

    fn base_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn time_of_day(minutes: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).unwrap()
    }

    fn arb_slot() -> impl Strategy<Value = TimeRange> {
        (0u32..(24 * 60 - 1), 1u32..120).prop_map(|(start, len)| {
            let end = (start + len).min(24 * 60 - 1);
            TimeRange::new(time_of_day(start), time_of_day(end))
        })
    }

    fn arb_now() -> impl Strategy<Value = NaiveDateTime> {
        (0u32..(24 * 60), 0u32..60).prop_map(|(minutes, seconds)| {
            base_date().and_time(time_of_day(minutes)) + Duration::seconds(seconds as i64)
        })
    }

    proptest! {
        // Filtering an already filtered list changes nothing
        #[test]
        fn test_filter_is_idempotent(
            slots in prop::collection::vec(arb_slot(), 0..20),
            now in arb_now(),
        ) {
            let once = filter_elapsed(&slots, base_date(), now);
            let twice = filter_elapsed(&once, base_date(), now);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn test_other_dates_are_returned_unchanged(
            slots in prop::collection::vec(arb_slot(), 0..20),
            now in arb_now(),
            offset in 1i64..400,
            backwards in any::<bool>(),
        ) {
            let offset = if backwards { -offset } else { offset };
            let other = base_date() + Duration::days(offset);
            prop_assert_eq!(filter_elapsed(&slots, other, now), slots);
        }

        // Today keeps exactly the slots that start after now
        #[test]
        fn test_today_keeps_only_future_starts(
            slots in prop::collection::vec(arb_slot(), 0..20),
            now in arb_now(),
        ) {
            let remaining = filter_elapsed(&slots, base_date(), now);
            for slot in &remaining {
                prop_assert!(slot_start(base_date(), slot) > now);
            }
            let expected = slots
                .iter()
                .filter(|slot| slot_start(base_date(), slot) > now)
                .count();
            prop_assert_eq!(remaining.len(), expected);
        }

        // Any resolves to a member that still has a slot to offer
        #[test]
        fn test_any_never_resolves_to_exhausted_staff(
            lists in prop::collection::vec(prop::collection::vec(arb_slot(), 0..5), 0..6),
            now in arb_now(),
        ) {
            let staff: Vec<StaffTimeSlot> = lists
                .into_iter()
                .enumerate()
                .map(|(i, slots)| StaffTimeSlot {
                    staff_id: StaffId(i as u64 + 1),
                    staff_name: format!("Staff {}", i + 1),
                    slots,
                })
                .collect();
            match resolve_staff(StaffChoice::Any, &staff, base_date(), now) {
                Some(member) => {
                    prop_assert!(!filter_elapsed(&member.slots, base_date(), now).is_empty());
                }
                None => {
                    for member in &staff {
                        prop_assert!(filter_elapsed(&member.slots, base_date(), now).is_empty());
                    }
                }
            }
        }
    }
}
