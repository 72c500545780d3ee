use clap::Parser;

/// Command-line options of the launcher.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "runtests")]
#[command(about = "Run the ORM test suites against a database engine")]
pub struct Options {
    #[arg(
        short,
        long,
        default_value = "sqlite",
        help = "Database engine to test, one of [sqlite, postgres, mysql]"
    )]
    pub engine: String,

    #[arg(short, long, default_value_t = 1, help = "Verbosity of output")]
    pub verbosity: u32,

    #[arg(short, long, help = "Run all tests, including extras")]
    pub all: bool,

    #[arg(short = 'x', long, help = "Run only extras tests")]
    pub extra: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            engine: "sqlite".to_string(),
            verbosity: 1,
            all: false,
            extra: false,
        }
    }
}
