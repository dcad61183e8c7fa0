use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "weather-api",
    version,
    about = "SMHI forecast endpoints (current temperature, per-date listing, daily averages)"
)]
pub struct Args {
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
    #[arg(long, default_value_t = 7071)]
    pub port: u16,
    #[arg(long, default_value_t = false)]
    pub print_openapi: bool,
}
