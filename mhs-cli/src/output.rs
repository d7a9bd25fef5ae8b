//! Output formatting utilities.
//! 输出格式化工具。
//!
//! Results go to stdout; everything else goes to stderr so that the printed
//! value can be piped.
//! 结果写入标准输出，其余信息写入标准错误输出。

/// Print a success message in green.
/// 以绿色打印成功消息。
pub fn success(msg: &str) {
    eprintln!("\x1b[32m{msg}\x1b[0m");
}

/// Print an error message in red.
/// 以红色打印错误消息。
pub fn error(msg: &str) {
    eprintln!("\x1b[31merror:\x1b[0m {msg}");
}

/// Print an info message in blue.
/// 以蓝色打印信息消息。
pub fn info(msg: &str) {
    eprintln!("\x1b[34minfo:\x1b[0m {msg}");
}

/// Print a message written by the `trace` primitive.
/// 打印 `trace` 原语输出的消息。
pub fn trace(msg: &str) {
    eprintln!("\x1b[35mtrace:\x1b[0m {msg}");
}
