//! mhs CLI - The micro-Haskell interpreter command line interface.
//! mhs CLI - micro-Haskell 解释器的命令行界面。

mod commands;
mod output;

use std::sync::Once;

use clap::{Args, Parser, Subcommand};

use commands::Settings;

/// Main CLI structure.
/// 主 CLI 结构体。
#[derive(Parser)]
#[command(name = "mhs")]
#[command(author, version, about = "mhs - A lazy interpreter for a small Haskell subset", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output. / 启用详细输出。
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress output. / 抑制输出。
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Elide constructor fields nested deeper than N when printing.
    /// 打印时省略嵌套深度超过 N 的构造器字段。
    #[arg(long, global = true, value_name = "N")]
    max_depth: Option<usize>,
}

/// Options shared by the commands that evaluate a program.
/// 求值命令共享的选项。
#[derive(Args, Clone, Debug, Default)]
pub struct EvalArgs {
    /// Print the result as JSON. / 以 JSON 格式打印结果。
    #[arg(long)]
    pub json: bool,

    /// Print evaluation statistics. / 打印求值统计信息。
    #[arg(long)]
    pub stats: bool,

    /// Do not load the prelude. / 不加载 prelude。
    #[arg(long)]
    pub no_prelude: bool,
}

/// Available CLI commands.
/// 可用的 CLI 命令。
#[derive(Subcommand)]
enum Commands {
    /// Run a micro-Haskell file. / 运行 micro-Haskell 文件。
    Run {
        /// The file to run. / 要运行的文件。
        file: String,

        /// Binding a module evaluates to. / 模块求值的入口绑定。
        #[arg(long, default_value = mhs_eval::DEFAULT_ENTRY)]
        entry: String,

        #[command(flatten)]
        args: EvalArgs,
    },

    /// Evaluate an expression. / 求值表达式。
    Eval {
        /// The expression to evaluate. / 要求值的表达式。
        expr: String,

        #[command(flatten)]
        args: EvalArgs,
    },

    /// Report unbound variables without running. / 报告未绑定变量而不运行。
    Check {
        /// The file to check. / 要检查的文件。
        file: String,
    },

    /// Print the tokens of a file. / 打印文件的词法单元。
    Tokens {
        /// The file to tokenize. / 要分词的文件。
        file: String,

        /// Print tokens as JSON. / 以 JSON 格式打印词法单元。
        #[arg(long)]
        json: bool,
    },

    /// Start an interactive REPL. / 启动交互式 REPL。
    Repl {
        /// Do not load the prelude. / 不加载 prelude。
        #[arg(long)]
        no_prelude: bool,
    },
}

static TRACING_INIT: Once = Once::new();

/// Install the global tracing subscriber. `RUST_LOG` wins over `--verbose`.
/// 安装全局 tracing 订阅器。
fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        let default = if verbose { "debug" } else { "warn" };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(filter)
            .init();
    });
}

/// Main entry point.
/// 主入口点。
fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = Settings {
        verbose: cli.verbose,
        quiet: cli.quiet,
        max_depth: cli.max_depth,
    };

    let result = match cli.command {
        Commands::Run { file, entry, args } => commands::run::run(&file, &entry, &args, &settings),
        Commands::Eval { expr, args } => commands::eval::run(&expr, &args, &settings),
        Commands::Check { file } => commands::check::run(&file, &settings),
        Commands::Tokens { file, json } => commands::tokens::run(&file, json, &settings),
        Commands::Repl { no_prelude } => commands::repl::run(no_prelude, &settings),
    };

    if let Err(e) = result {
        if !cli.quiet {
            output::error(&e);
        }
        std::process::exit(1);
    }
}
