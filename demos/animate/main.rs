use std::time::Duration;

use darboux::session::{clamp_step_delay, DEFAULT_STEP_DELAY};
use darboux::{Config, PartitionMode, Session};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let function = args.next().unwrap_or_else(|| "exp_sin_square".to_owned());
    let mode = args.next().unwrap_or_else(|| "random".to_owned());
    let delay = match args.next() {
        Some(ms) => clamp_step_delay(Duration::from_millis(ms.parse()?)),
        None => DEFAULT_STEP_DELAY,
    };

    let config = Config {
        a: 0.,
        b: 2.,
        max_points: 25,
        function: function.parse()?,
        mode: mode.parse::<PartitionMode>()?,
    };

    let mut session = Session::new(config, None)?;
    println!("{}\n{}\n", session.config().function, session.report());

    while session.step()? {
        std::thread::sleep(delay);
        println!("{}\n", session.report());
    }

    Ok(())
}
