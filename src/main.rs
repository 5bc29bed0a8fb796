use std::process::ExitCode;

use clap::Parser;
use hash_perf::config::Cli;
use hash_perf::container::REGISTRY;
use hash_perf::driver;
use hash_perf::memory::MemoryProbe;
use tracing::error;

cfg_if::cfg_if! {
    if #[cfg(feature = "counting-allocator")] {
        use hash_perf::memory::CountingAllocator;

        #[global_allocator]
        static ALLOC: CountingAllocator = CountingAllocator::system();

        fn memory_probe() -> &'static dyn MemoryProbe {
            &ALLOC
        }
    } else {
        use hash_perf::memory::NullProbe;

        fn memory_probe() -> &'static dyn MemoryProbe {
            &NullProbe
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .init();

    if cli.list {
        for registration in REGISTRY {
            println!("{}", registration.name);
        }
        return ExitCode::SUCCESS;
    }

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(err) => {
            error!(%err, "invalid configuration");
            eprintln!("hash-perf: {err}");
            return ExitCode::FAILURE;
        }
    };

    let report = driver::run(&config, memory_probe());
    print!("{report}");
    ExitCode::SUCCESS
}
