use clap::Parser;
use log::{error, info};
use simple_logger::SimpleLogger;
use godunov::field::FieldBlock;
use godunov::hydro::config::{Config, SolverVariant};
use godunov::hydro::eos::GammaLaw;
use godunov::hydro::geometry::Direction;
use godunov::hydro::state::InterfaceState;
use godunov::solvers::ppm_sweep::{self, Pencil, NUM_GUARD, QFS, QPRES, QREINT, QRHO, QU, QV, QW};

const GAMMA_LAW_INDEX: f64 = 1.4;




#[derive(Debug, Parser)]
#[clap(version = "0.1", author = "J. Zrake <jzrake@clemson.edu>")]

/**
 * Resolve the interfaces of a Sod shock tube with both Riemann solvers
 */
struct Opts {
    #[clap(short = 'n', long, default_value = "100")]
    num_zones: i64,

    #[clap(short = 'c', long, default_value = "0.5")]
    cfl: f64,

    #[clap(short = 'o', long, default_value = "shock_tube.cbor")]
    output: String,

    #[clap(short = 'l', long, default_value = "info")]
    log_level: log::LevelFilter,
}




#[derive(serde::Serialize)]

/**
 * The interface states from one sweep
 */
struct Solution {
    config: Config,
    states: Vec<InterfaceState>,
}




#[derive(serde::Serialize)]
struct Output {
    pencil: Pencil,
    solutions: Vec<Solution>,
}




// ============================================================================
fn initial_block(num_zones: i64) -> FieldBlock {
    let area = (-NUM_GUARD..num_zones + NUM_GUARD, 0..1, 0..1);

    FieldBlock::from_function(area, QFS + 1, |(i, _, _), q| {
        let (rho, p) = if 2 * i < num_zones { (1.0, 1.0) } else { (0.125, 0.1) };
        q[QRHO] = rho;
        q[QU] = 0.0;
        q[QV] = 0.0;
        q[QW] = 0.0;
        q[QPRES] = p;
        q[QREINT] = p / (GAMMA_LAW_INDEX - 1.0);
        q[QFS] = 1.0;
    })
}




// ============================================================================
fn main() {
    let opts = Opts::parse();
    SimpleLogger::new().with_level(opts.log_level).init().unwrap();
    info!("{:?}", opts);

    let eos = GammaLaw::new(GAMMA_LAW_INDEX);
    let primitive = initial_block(opts.num_zones);
    let dx = 1.0 / opts.num_zones as f64;
    let dt = opts.cfl * dx / eos.sound_speed(1.0, 1.0);
    let pencil = Pencil::new(Direction::I, (0, 0, 0), 0..opts.num_zones + 1, dt, dx).with_walls(true, true);

    let mut solutions = Vec::new();

    for &solver in &[SolverVariant::TwoShock, SolverVariant::DirectCgf] {
        let config = Config::default().with_solver(solver);
        let start = std::time::Instant::now();

        match ppm_sweep::sweep(&primitive, None::<&FieldBlock>, &eos, &pencil, &config) {
            Ok(states) => {
                let middle = states[states.len() / 2];
                info!(
                    "{:?}: {} interfaces in {:.3}ms, center p={:.6} u={:.6}",
                    solver,
                    states.len(),
                    start.elapsed().as_secs_f64() * 1e3,
                    middle.p,
                    middle.un
                );
                solutions.push(Solution { config, states });
            }
            Err(e) => error!("{:?}: {}", solver, e),
        }
    }

    let file = std::fs::File::create(&opts.output).unwrap();
    let mut buffer = std::io::BufWriter::new(file);
    ciborium::ser::into_writer(&Output { pencil, solutions }, &mut buffer).unwrap();
    info!("wrote {}", opts.output);
}
