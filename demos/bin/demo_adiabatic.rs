//! Adiabatic Sweep Demo
//!
//! Interpolates from `-Σ X_i` to a transverse-field Ising chain and reports
//! how close the final state gets to the problem ground-state energy.

use anyhow::Result;
use clap::Parser;
use tracing::info;

use qterm_demos::{
    create_progress_bar, init_tracing, print_header, print_result, print_section, print_success,
};
use qterm_sim::{AdiabaticHamiltonian, models};
use qterm_state::{DenseSimulator, plus_state};

#[derive(Parser, Debug)]
#[command(name = "demo-adiabatic")]
#[command(about = "Adiabatic sweep from a uniform X field to an Ising chain")]
struct Args {
    /// Number of spins
    #[arg(short, long, default_value = "4")]
    qubits: usize,

    /// Transverse field of the problem Hamiltonian
    #[arg(long, default_value = "0.5")]
    field: f64,

    /// Sweep durations to compare
    #[arg(short, long, value_delimiter = ',', default_value = "1,5,10,20")]
    times: Vec<f64>,

    /// Time step
    #[arg(long, default_value = "0.05")]
    dt: f64,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    print_header("Adiabatic Sweep Demo");

    let h = AdiabaticHamiltonian::new(
        models::x_field(args.qubits)?,
        models::tfim(args.qubits, args.field)?,
    )?;

    print_section("Problem Setup");
    print_result("Qubits", h.nqubits());
    print_result("H0 terms", h.h0().n_terms());
    print_result("H1 terms", h.h1().n_terms());
    print_result("Shared groups", h.groups().len());

    print_section("Sweeps");
    let start_energy = h.h1().expectation(&plus_state(h.nqubits()))?;
    print_result("⟨H1⟩ of |+…+⟩", format!("{start_energy:.6}"));

    let pb = create_progress_bar(args.times.len() as u64, "Sweeping");
    let mut results = Vec::with_capacity(args.times.len());
    for &total_time in &args.times {
        let state = h.evolve(plus_state(h.nqubits()), |s| s, total_time, args.dt, &DenseSimulator)?;
        let energy = h.h1().expectation(&state)?;
        info!(total_time, energy, "sweep finished");
        results.push((total_time, energy));
        pb.inc(1);
    }
    pb.finish_with_message("Sweeps complete");

    print_section("Final Problem Energy");
    for (total_time, energy) in &results {
        print_result(&format!("T = {total_time:>6.2}"), format!("{energy:.6}"));
    }

    print_success("Demo complete");
    Ok(())
}
