// --- File: crates/services/harmony_booker/src/main.rs ---
mod args;
mod service_factory;

use args::Args;
use harmony_booking::filter::{staff_availability, SlotAvailability};
use harmony_booking::selection::FlowOrder;
use harmony_booking::session::BookingSession;
use harmony_booking::submission::BookingContext;
use harmony_common::{config_error, logging, HarmonyError, UserFacing};
use harmony_config::{ensure_dotenv_loaded, load_config};
use service_factory::BookingServices;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;

/// Exit status for failures worth retrying unchanged (sysexits `EX_TEMPFAIL`).
const EXIT_TEMPFAIL: u8 = 75;

#[tokio::main]
async fn main() -> ExitCode {
    match logging::log_result(run().await, "harmony-booker finished", "harmony-booker failed") {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err.user_message());
            ExitCode::from(failure_status(&err))
        }
    }
}

fn failure_status(err: &HarmonyError) -> u8 {
    if err.is_retryable() {
        EXIT_TEMPFAIL
    } else {
        1
    }
}

async fn run() -> Result<(), HarmonyError> {
    let dotenv_path = ensure_dotenv_loaded();
    let config = Arc::new(load_config().map_err(config_error)?);
    logging::init_from_config(config.logging.as_ref());
    debug!("environment loaded from {}", dotenv_path);

    let args = Args::parse(std::env::args().skip(1))?;
    let services = BookingServices::new(config)?;
    let context = BookingContext::from_raw(args.business_id, args.service_id)?;
    let mut session = services.session(context);

    // Walk the steps in the configured order
    match session.state().order() {
        FlowOrder::StaffFirst => {
            session.select_staff(args.staff)?;
            session.select_date(args.date).await?;
        }
        FlowOrder::DateFirst => {
            session.select_date(args.date).await?;
            session.select_staff(args.staff)?;
        }
    }

    print_availability(&session);

    let Some(number) = args.slot else {
        return Ok(());
    };
    let availability = session
        .visible_slots()
        .unwrap_or(SlotAvailability::NoneOffered);
    let slot = availability
        .slots()
        .get(number - 1)
        .copied()
        .ok_or_else(|| HarmonyError::ValidationError(format!("there is no slot {}", number)))?;
    session.select_time_slot(slot)?;

    let record = session
        .submit(services.submitter())
        .await
        .map_err(|rejected| HarmonyError::from(rejected.error))?;
    println!(
        "Booked {} on {} {} (booking {}, {:?})",
        args.staff, args.date, slot, record.id, record.status
    );
    Ok(())
}

fn print_availability(session: &BookingSession) {
    let Some(date) = session.state().selected_date() else {
        return;
    };
    let now = session.now();
    println!("Availability on {}:", date);
    for member in session.visible().staff() {
        let offer = staff_availability(member, date, now);
        match offer.empty_message() {
            Some(message) => println!("  {} ({}): {}", member.staff_name, member.staff_id, message),
            None => {
                let slots: Vec<String> = offer.slots().iter().map(ToString::to_string).collect();
                println!("  {} ({}): {}", member.staff_name, member.staff_id, slots.join(", "));
            }
        }
    }

    if let (Some(choice), Some(offer)) = (session.state().staff(), session.visible_slots()) {
        println!("Slots for {}:", choice);
        match offer.empty_message() {
            Some(message) => println!("  {}", message),
            None => {
                for (i, slot) in offer.slots().iter().enumerate() {
                    println!("  {:>2}. {}", i + 1, slot);
                }
            }
        }
    }
}
