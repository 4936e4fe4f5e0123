use clap::{Parser, Subcommand};
use clinic_core::config::{bool_from_env_value, delete_policy_from_env_value};
use clinic_core::constants::{
    CANCELLED_SLOTS_BLOCK_ENV, CLINIC_NAME_ENV, DEFAULT_CLINIC_NAME, DELETE_POLICY_ENV,
    STANDARD_TIME_SLOTS,
};
use clinic_core::{
    BillCharges, Clinic, CoreConfig, DoctorDetails, MedicationDetails, NewPrescription,
    PatientDetails, PaymentStatus, Role,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "clinic-run")]
#[command(about = "In-memory clinic records: slot listing and a scripted demo")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the standard bookable time slots
    Slots,
    /// Seed a clinic, run the booking and prescription flows, and print a summary
    Demo {
        /// Print the resulting records as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Resolve the core configuration once from the environment.
///
/// # Environment Variables
/// - `CLINIC_NAME`: name used in log lines (default: "clinic")
/// - `CLINIC_DELETE_POLICY`: `ignore`, `restrict` or `cascade` (default: ignore)
/// - `CLINIC_CANCELLED_SLOTS_BLOCK`: whether cancelled appointments keep their slot
///   (default: false)
fn config_from_env() -> anyhow::Result<CoreConfig> {
    let name = std::env::var(CLINIC_NAME_ENV).unwrap_or_else(|_| DEFAULT_CLINIC_NAME.into());
    let delete_policy = delete_policy_from_env_value(std::env::var(DELETE_POLICY_ENV).ok())?;
    let cancelled_block =
        bool_from_env_value(std::env::var(CANCELLED_SLOTS_BLOCK_ENV).ok(), false)?;

    Ok(CoreConfig::new(name, delete_policy, cancelled_block)?)
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("clinic=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Slots) => {
            for slot in STANDARD_TIME_SLOTS {
                println!("{slot}");
            }
        }
        Some(Commands::Demo { json }) => {
            let cfg = Arc::new(config_from_env()?);
            tracing::info!(
                "++ Starting {} (delete policy: {:?}, cancelled slots block: {})",
                cfg.clinic_name(),
                cfg.delete_policy(),
                cfg.cancelled_slots_block_booking()
            );
            let clinic = run_demo(Clinic::with_tracing(cfg))?;
            print_summary(&clinic, json)?;
        }
        None => {
            println!("Use 'clinic-run --help' for commands");
        }
    }

    Ok(())
}

fn run_demo(mut clinic: Clinic) -> anyhow::Result<Clinic> {
    clinic.auth.register_user("admin", "admin", Role::Admin)?;
    clinic.auth.register_user("desk", "desk", Role::Reception)?;
    let session = clinic.auth.login("desk", "desk")?;
    tracing::info!("Session opened for {} ({})", session.username, session.role);

    let grey = clinic.doctors.add(
        DoctorDetails::new("Dr. Meredith Grey", "General Surgery", 120.0)
            .with_email("grey@clinic.test"),
    )?;
    let shep = clinic
        .doctors
        .add(DoctorDetails::new("Dr. Derek Shepherd", "Neurology", 150.0))?;

    let ann = clinic.patients.add(
        PatientDetails::new("Ann Lee", 34, "Migraine")
            .with_contact("555-0100")
            .with_blood_group("O+"),
    )?;
    let bob = clinic
        .patients
        .add(PatientDetails::new("Bob Ray", 61, "Hypertension"))?;

    let aspirin = clinic
        .medications
        .add(MedicationDetails::new("Aspirin", "100mg", 2.5).with_manufacturer("Bayer"))?;
    let lisinopril = clinic
        .medications
        .add(MedicationDetails::new("Lisinopril", "10mg", 8.0))?;

    clinic.book_appointment(ann, shep, "2024-05-01", STANDARD_TIME_SLOTS[0])?;
    if let Err(err) = clinic.book_appointment(bob, shep, "2024-05-01", STANDARD_TIME_SLOTS[0]) {
        println!("Second booking refused as expected: {err}");
    }
    clinic.book_appointment(bob, grey, "2024-05-01", STANDARD_TIME_SLOTS[0])?;
    clinic.diagnose(shep, ann, "Chronic migraine")?;

    clinic.create_prescription(
        NewPrescription::new(ann, shep, "2024-05-01", vec![aspirin])
            .with_instructions("One tablet at onset"),
    )?;
    let bob_rx = clinic.create_prescription(NewPrescription::new(
        bob,
        grey,
        "2024-05-01",
        vec![lisinopril, aspirin],
    ))?;
    clinic.update_prescription(bob_rx, vec![lisinopril], Some("Once daily".into()))?;

    let fee = clinic
        .doctors
        .get(shep)
        .map(|d| d.consultation_fee)
        .unwrap_or_default();
    let bill = clinic.generate_bill(
        ann,
        "2024-05-01",
        BillCharges::consultation(fee).with_medication_charges(2.5),
    )?;
    clinic
        .billing
        .update_payment_status(bill, PaymentStatus::Paid, Some("Card".into()))?;

    clinic.doctors.set_availability(grey, false)?;
    if let Err(err) = clinic.book_appointment(ann, grey, "2024-05-02", STANDARD_TIME_SLOTS[1]) {
        println!("Booking with unavailable doctor refused as expected: {err}");
    }

    clinic.auth.logout();
    Ok(clinic)
}

fn print_summary(clinic: &Clinic, json: bool) -> anyhow::Result<()> {
    if json {
        let summary = serde_json::json!({
            "patients": clinic.patients.list_all(),
            "doctors": clinic.doctors.list_all(),
            "appointments": clinic.appointments.list_all(),
            "medications": clinic.medications.list_all(),
            "prescriptions": clinic.prescriptions.list_all(),
            "bills": clinic.billing.list_all(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    for patient in clinic.patients.list_all() {
        let held: Vec<String> = patient
            .medications
            .ids()
            .filter_map(|id| clinic.medications.get(id))
            .map(|m| m.name.to_string())
            .collect();
        println!(
            "Patient {}: {}, age {}, {} | medications: {}",
            patient.id,
            patient.name,
            patient.age,
            patient.disease,
            if held.is_empty() { "none".into() } else { held.join(", ") }
        );
    }
    for appointment in clinic.appointments.list_all() {
        println!(
            "Appointment {}: patient {} with doctor {} on {} at {} [{}]",
            appointment.id,
            appointment.patient_id,
            appointment.doctor_id,
            appointment.date,
            appointment.time_slot,
            appointment.status
        );
    }
    println!(
        "Revenue: {:.2} (outstanding {:.2})",
        clinic.billing.total_revenue(),
        clinic.billing.outstanding_total()
    );

    Ok(())
}
