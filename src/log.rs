use log::{Level, LevelFilter};
use log4rs::{
    append::console::ConsoleAppender,
    append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller,
    append::rolling_file::policy::compound::trigger::size::SizeTrigger,
    append::rolling_file::policy::compound::CompoundPolicy,
    append::rolling_file::RollingFileAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};
use nu_ansi_term::Color;
use std::path::Path;

const FILE_PATTERN: &str = "{l} - {d(%Y-%m-%d %H:%M:%S)} - {t} - {m}{n}";
const ROLL_SIZE: u64 = 2 * 1024 * 1024;
const ROLL_COUNT: u32 = 10;

/// 控制台输出按级别着色
struct ColorEncoder;

impl std::fmt::Debug for ColorEncoder {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("ColorEncoder")
    }
}

impl log4rs::encode::Encode for ColorEncoder {
    fn encode(
        &self,
        buf: &mut dyn log4rs::encode::Write,
        record: &log::Record,
    ) -> Result<(), anyhow::Error> {
        let color = match record.level() {
            Level::Error => Color::Red,
            Level::Warn => Color::Yellow,
            Level::Info => Color::Green,
            Level::Debug => Color::Blue,
            Level::Trace => Color::Purple,
        };
        let line = format!(
            "{} - {} - {} - {}",
            record.level(),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.target(),
            record.args()
        );

        writeln!(buf, "{}", color.paint(line)).map_err(anyhow::Error::new)
    }
}

/// 初始化日志: 彩色控制台 + `<log_dir>/bench.log` 按大小滚动
pub fn init_logger(log_dir: &Path, level: LevelFilter) -> anyhow::Result<()> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(ColorEncoder))
        .build();

    let roll_pattern = log_dir.join("bench.{}.log");
    let window_roller = FixedWindowRoller::builder()
        .base(1)
        .build(&roll_pattern.to_string_lossy(), ROLL_COUNT)?;
    let compound_policy = CompoundPolicy::new(
        Box::new(SizeTrigger::new(ROLL_SIZE)),
        Box::new(window_roller),
    );
    let file_appender = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(FILE_PATTERN)))
        .build(log_dir.join("bench.log"), Box::new(compound_policy))?;

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .appender(Appender::builder().build("file", Box::new(file_appender)))
        .build(
            Root::builder()
                .appender("stdout")
                .appender("file")
                .build(level),
        )?;

    log4rs::init_config(config)?;
    Ok(())
}
