/// CLI tool for expanding prompt templates
use clap::{ArgAction, Parser};
use dynprompt::{
    diagnostic, ChainWildcards, ExpanderConfig, FolderWildcards, PromptGenerator, QuantitySpec,
    WildcardLookup,
};
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "dynprompt",
    version,
    about = "Expand dynamic prompt templates into concrete prompts",
    after_help = "Examples:\n  \
        dynprompt 'a {red|blue} ball'              # Random output\n  \
        dynprompt -n 4 --seed 42 'a __color__ car' -w ./wildcards\n  \
        cat template.txt | dynprompt -            # Read from stdin"
)]
struct Cli {
    /// Template text, or `-` to read it from stdin
    #[arg(required_unless_present = "list_wildcards")]
    template: Option<String>,

    /// Number of prompts to generate
    #[arg(short = 'n', long, default_value_t = 1)]
    count: usize,

    /// Seed for reproducible output (default: random)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Draw from the process-wide random stream, ignoring the seed
    #[arg(long)]
    unlink_seed: bool,

    /// Directory of wildcard files; repeat to pool several directories
    #[arg(short, long = "wildcards", value_name = "DIR")]
    wildcard_dirs: Vec<PathBuf>,

    /// Default joiner for combinations without one
    #[arg(long)]
    joiner: Option<String>,

    /// Default quantity for combinations without one, e.g. 1 or 1-3
    #[arg(long, value_name = "QUANTITY")]
    default_quantity: Option<QuantitySpec>,

    /// Bound on each rewrite loop
    #[arg(long)]
    max_recursions: Option<usize>,

    /// Most variants one combination may draw
    #[arg(long)]
    max_combinations: Option<usize>,

    /// JSON config file; command-line options override it
    #[arg(short, long, env = "DYNPROMPT_CONFIG")]
    config: Option<PathBuf>,

    /// Print each prompt with its expansion trace as JSON
    #[arg(long)]
    trace: bool,

    /// List the wildcards found in the wildcard directories and exit
    #[arg(long)]
    list_wildcards: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> ExpanderConfig {
    let mut config = match &cli.config {
        Some(path) => ExpanderConfig::from_json_file(path).unwrap_or_else(|e| {
            eprintln!("Error loading config: {}", e);
            process::exit(1);
        }),
        None => ExpanderConfig::default(),
    };

    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if cli.unlink_seed {
        config.unlink_seed_from_prompt = true;
    }
    if let Some(joiner) = &cli.joiner {
        config.default_combo_joiner = joiner.clone();
    }
    if let Some(quantity) = cli.default_quantity {
        config.default_num_combinations = quantity;
    }
    if let Some(max_recursions) = cli.max_recursions {
        config.max_recursions = max_recursions;
    }
    if let Some(max_combinations) = cli.max_combinations {
        config.max_combinations = max_combinations;
    }

    config
}

fn list_wildcards(dirs: &[PathBuf]) {
    for dir in dirs {
        let names = FolderWildcards::new(dir).list_available().unwrap_or_else(|e| {
            eprintln!("Error listing wildcards in '{}': {}", dir.display(), e);
            process::exit(1);
        });
        for name in names {
            println!("{}", name);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.list_wildcards {
        list_wildcards(&cli.wildcard_dirs);
        return;
    }

    let config = load_config(&cli);

    // Read template
    let (template, source_name) = match cli.template.as_deref() {
        Some("-") | None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).unwrap_or_else(|e| {
                eprintln!("Error reading from stdin: {}", e);
                process::exit(1);
            });
            // Trailing newline from `echo` or an editor is not part of the prompt
            let trimmed = buffer.trim_end_matches(['\n', '\r']).len();
            buffer.truncate(trimmed);
            (buffer, "<stdin>")
        }
        Some(text) => (text.to_string(), "<template>"),
    };

    let lookup: Arc<dyn WildcardLookup> = Arc::new(ChainWildcards::from_lookups(
        cli.wildcard_dirs
            .iter()
            .map(|dir| Arc::new(FolderWildcards::new(dir)) as Arc<dyn WildcardLookup>)
            .collect(),
    ));

    let mut generator = PromptGenerator::new(template.clone(), lookup, config);

    for _ in 0..cli.count {
        let result = if cli.trace {
            generator
                .generate_prompt_with_trace(&template)
                .map(|traced| serde_json::to_string_pretty(&traced).unwrap_or_else(|e| e.to_string()))
        } else {
            generator.generate_prompt(&template)
        };

        match result {
            Ok(output) => println!("{}", output),
            Err(e) => {
                let diagnostic = diagnostic::report_expand_error(source_name, &template, &e);
                eprint!("{}", diagnostic);
                process::exit(1);
            }
        }
    }
}
