//! Ising Quench Demo
//!
//! Evolves `|+…+⟩` under a transverse-field Ising chain (or any expression
//! given with `--expr`) and prints energy and magnetization traces.

use anyhow::{Context, Result, bail};
use clap::Parser;
use rustc_hash::FxHashMap;
use tracing::info;

use qterm_core::QuantumState;
use qterm_demos::quench::QuenchRunner;
use qterm_demos::{
    create_progress_bar, init_tracing, print_header, print_info, print_result, print_section,
    print_success,
};
use qterm_sim::{EvolutionConfig, SymbolTable, SymbolicHamiltonian, TrotterOrder, models};
use qterm_state::{density_from_vector, outcome_to_bitstring, plus_state, sample};

#[derive(Parser, Debug)]
#[command(name = "demo-ising")]
#[command(about = "Trotterized quench of a transverse-field Ising chain")]
struct Args {
    /// Number of spins
    #[arg(short, long, default_value = "4")]
    qubits: usize,

    /// Transverse field strength h
    #[arg(long, default_value = "1.0")]
    field: f64,

    /// Custom Hamiltonian expression, e.g. "-Z0*Z1 - 0.5*X0"
    #[arg(short, long)]
    expr: Option<String>,

    /// Total evolution time
    #[arg(short, long, default_value = "2.0")]
    time: f64,

    /// Trotter time step (overrides QTERM_DT)
    #[arg(long)]
    dt: Option<f64>,

    /// Trotter order, 1 or 2 (overrides QTERM_TROTTER_ORDER)
    #[arg(long)]
    order: Option<TrotterOrder>,

    /// Evolve a density matrix instead of a state vector
    #[arg(long)]
    density: bool,

    /// Measurement samples drawn from the final state
    #[arg(short, long, default_value = "1000")]
    shots: usize,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    print_header("Ising Quench Demo");

    let hamiltonian = match &args.expr {
        Some(expr) => SymbolicHamiltonian::parse(expr, &SymbolTable::new())
            .with_context(|| format!("parsing '{expr}'"))?,
        None => models::tfim(args.qubits, args.field)?,
    };
    if hamiltonian.nqubits() == 0 {
        bail!("Hamiltonian acts on no qubits");
    }

    let mut config = EvolutionConfig::from_env();
    if let Some(dt) = args.dt {
        config = config.with_dt(dt);
    }
    if let Some(order) = args.order {
        config = config.with_order(order);
    }

    print_section("Problem Setup");
    print_result("Qubits", hamiltonian.nqubits());
    print_result("Terms", hamiltonian.n_terms());
    print_result("Groups", hamiltonian.groups().len());
    print_result("Time step", config.dt);
    print_result("Trotter order", format!("{:?}", config.order));
    print_result("Representation", if args.density { "density matrix" } else { "state vector" });

    print_section("Term Groups");
    for (i, group) in hamiltonian.groups().iter().enumerate() {
        println!(
            "  G{i}: qubits {:?}, {} member(s)",
            group.parent().target_qubits(),
            group.len()
        );
    }

    let n = hamiltonian.nqubits();
    let runner = QuenchRunner::new(hamiltonian, config)?;
    let n_steps = runner.n_steps(args.time)?;

    let initial = plus_state(n);
    let initial = if args.density { density_from_vector(initial) } else { initial };

    print_section("Evolving");
    let pb = create_progress_bar(n_steps as u64, "Trotter steps");
    let result = runner.run(initial, args.time, |_| pb.inc(1))?;
    pb.finish_with_message("Evolution complete");
    info!(n_steps, "quench finished");

    print_section("Observables");
    println!("  {:>8}  {:>12}  {:>10}  {:>10}", "t", "⟨H⟩", "⟨Z⟩", "⟨X⟩");
    let stride = (result.history.len() / 10).max(1);
    for record in result.history.iter().step_by(stride) {
        println!(
            "  {:>8.3}  {:>12.6}  {:>10.6}  {:>10.6}",
            record.time, record.energy, record.magnetization_z, record.magnetization_x
        );
    }

    if let (Some(first), Some(last)) = (result.history.first(), result.history.last()) {
        print_result("Energy drift", format!("{:.3e}", (last.energy - first.energy).abs()));
    }

    if args.shots > 0 {
        print_section("Sampling Final State");
        let mut rng = rand::thread_rng();
        let mut counts: FxHashMap<usize, usize> = FxHashMap::default();
        for _ in 0..args.shots {
            *counts.entry(sample(&result.final_state, &mut rng)).or_default() += 1;
        }
        let mut counts: Vec<_> = counts.into_iter().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        for (outcome, count) in counts.iter().take(8) {
            print_result(&outcome_to_bitstring(*outcome, n), count);
        }
    }

    if let QuantumState::Density(_) = result.final_state {
        print_info("Density-matrix evolution applies U ρ U† per gate");
    }
    print_success("Demo complete");
    Ok(())
}
