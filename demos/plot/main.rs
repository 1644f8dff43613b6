use darboux::plot::plot_sums;
use darboux::{Config, Function, PartitionMode, Session};

fn main() {
    for mode in &[PartitionMode::Random, PartitionMode::Equidistant] {
        let config = Config {
            a: -0.5,
            b: 2.,
            max_points: 12,
            function: Function::Cubic,
            mode: *mode,
        };
        let mut session = Session::new(config, Some(1)).unwrap();
        session.run().unwrap();

        println!("{:?}:\n{}\n", mode, session.report());

        let filename = format!("darboux_{:?}.svg", mode).to_lowercase();
        plot_sums(
            &session.config().function,
            session.points(),
            session.config().function.label(),
            &filename,
        )
        .unwrap();
    }
}
