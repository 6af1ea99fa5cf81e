use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use tracing::warn;

use super::Sink;
use crate::error::Result;
use crate::record::AccessLogRecord;

/// JSON 行输出：每条记录写一行 JSON
pub struct JsonLineSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonLineSink {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    /// 标准输出（默认接收端）
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// 以追加方式写入文件，文件不存在时创建
    pub fn file(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        Ok(Self::new(file))
    }

    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        writeln!(writer, "{line}")?;
        writer.flush()
    }
}

impl Sink for JsonLineSink {
    fn accept(&self, record: AccessLogRecord) {
        let line = match record.to_json() {
            Ok(line) => line,
            Err(err) => {
                warn!(error = %err, "Failed to encode access log record");
                return;
            }
        };

        if let Err(err) = self.write_line(&line) {
            warn!(error = %err, "Failed to write access log record");
        }
    }
}

impl std::fmt::Debug for JsonLineSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLineSink").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    /// 共享缓冲，便于测试读取写入内容
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writes_one_line_per_record() {
        let buf = SharedBuf::default();
        let sink = JsonLineSink::new(buf.clone());

        let mut first = AccessLogRecord::new();
        first.insert("grpc_status_code", 0);
        sink.accept(first);

        let mut second = AccessLogRecord::new();
        second.insert("grpc_status_code", 5);
        sink.accept(second);

        let output = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert_eq!(
            output,
            "{\"grpc_status_code\":0}\n{\"grpc_status_code\":5}\n"
        );
    }

    #[test]
    fn appends_to_file() {
        let path = std::env::temp_dir().join(format!(
            "grpc-access-log-sink-{}.log",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let sink = JsonLineSink::file(&path).unwrap();
        let mut record = AccessLogRecord::new();
        record.insert("grpc_status_code", 2);
        sink.accept(record);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "{\"grpc_status_code\":2}\n");
        let _ = std::fs::remove_file(&path);
    }
}
