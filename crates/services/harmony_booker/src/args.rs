// --- File: crates/services/harmony_booker/src/args.rs ---
use chrono::NaiveDate;
use harmony_booking::models::{parse_date, StaffChoice};
use harmony_common::{validation_error, HarmonyError, StaffId};

pub const USAGE: &str =
    "usage: harmony-booker <business-id> <service-id> <yyyy-mm-dd> [staff-id|any] [slot-number]";

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub business_id: u64,
    pub service_id: u64,
    pub date: NaiveDate,
    pub staff: StaffChoice,
    /// 1-based index into the listed slots; books it when present.
    pub slot: Option<usize>,
}

impl Args {
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self, HarmonyError> {
        let args: Vec<String> = args.into_iter().collect();
        if args.len() < 3 || args.len() > 5 {
            return Err(validation_error(USAGE));
        }

        let business_id = parse_id(&args[0], "business id")?;
        let service_id = parse_id(&args[1], "service id")?;
        let date = parse_date(&args[2])
            .map_err(|_| validation_error(format!("invalid date {:?}, expected yyyy-mm-dd", args[2])))?;
        let staff = match args.get(3).map(String::as_str) {
            None | Some("any") => StaffChoice::Any,
            Some(raw) => StaffId::new(parse_id(raw, "staff id")?)
                .map(StaffChoice::Specific)
                .unwrap_or(StaffChoice::Any),
        };
        let slot = match args.get(4) {
            None => None,
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n >= 1 => Some(n),
                _ => return Err(validation_error(format!("invalid slot number {:?}", raw))),
            },
        };

        Ok(Self {
            business_id,
            service_id,
            date,
            staff,
            slot,
        })
    }
}

fn parse_id(raw: &str, what: &str) -> Result<u64, HarmonyError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| validation_error(format!("invalid {} {:?}", what, raw)))
}
