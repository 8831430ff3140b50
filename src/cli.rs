use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    Fasta,
    Fastq,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect U3/R/U5 LTR regions in each input sequence and classify it
    Analyze {
        /// Input sequence file (plain or gzip/bzip2/xz compressed)
        input_file: String,

        /// Input file format
        #[arg(long, value_enum, default_value = "fasta")]
        format: InputFormat,

        /// Screening threshold for coarse mapping quality (0.0-1.0)
        #[arg(long, default_value = "0.60")]
        coarse_threshold: f64,

        /// Similarity threshold for final sequence matching (0.0-1.0)
        #[arg(long, default_value = "0.70")]
        final_threshold: f64,

        /// Gap opening penalty
        #[arg(long, default_value = "-2", allow_hyphen_values = true)]
        gap_open: f32,

        /// Gap extension penalty
        #[arg(long, default_value = "-0.5", allow_hyphen_values = true)]
        gap_extend: f32,

        /// Output file for the reports (default: stdout)
        #[arg(short = 'o', long = "output")]
        output_file: Option<String>,

        /// Emit one JSON document per record instead of text
        #[arg(long)]
        json: bool,

        /// Enable debug output
        #[arg(long)]
        debug: bool,
    },
}
