//! 逐帧 CSV 导出
//!
//! 列：`Frame,Work(ms),Total(ms)`，之后按配置顺序每个阶段一列 `<Name>(ms)`。
//! 某帧缺少的区段记为 `0.000`。

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::{us_to_ms, ReportSink};
use crate::core::{ProfilerError, Result};
use crate::profiler::{FrameSample, FrameStats};

/// CSV 导出器
pub struct CsvExporter<W: Write> {
    out: W,
    columns: Vec<String>,
    header_written: bool,
    rows: u64,
}

impl CsvExporter<BufWriter<File>> {
    /// 创建（覆盖）CSV 文件
    pub fn create<P: AsRef<Path>>(path: P, columns: Vec<String>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| {
            ProfilerError::Report(format!("Failed to create '{}': {}", path.display(), e))
        })?;
        Ok(Self::new(BufWriter::new(file), columns))
    }
}

impl<W: Write> CsvExporter<W> {
    /// `columns` 是要导出的区段名称，决定列顺序
    pub fn new(out: W, columns: Vec<String>) -> Self {
        Self {
            out,
            columns,
            header_written: false,
            rows: 0,
        }
    }

    /// 已写入的数据行数
    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_header(&mut self) -> Result<()> {
        write!(self.out, "Frame,Work(ms),Total(ms)")?;
        for column in &self.columns {
            write!(self.out, ",{}(ms)", column)?;
        }
        writeln!(self.out)?;
        self.header_written = true;
        Ok(())
    }

    fn write_row(&mut self, sample: &FrameSample) -> Result<()> {
        write!(
            self.out,
            "{},{:.3},{:.3}",
            sample.frame_index,
            sample.work_ms(),
            sample.total_ms()
        )?;
        for column in &self.columns {
            let micros = sample.section_us(column).unwrap_or(0);
            write!(self.out, ",{:.3}", us_to_ms(micros))?;
        }
        writeln!(self.out)?;
        self.rows += 1;
        Ok(())
    }
}

impl<W: Write> ReportSink for CsvExporter<W> {
    fn on_frame(&mut self, _stats: &FrameStats, sample: &FrameSample) -> Result<()> {
        if !self.header_written {
            self.write_header()?;
        }
        self.write_row(sample)
    }

    fn finish(&mut self, _stats: &FrameStats) -> Result<()> {
        if !self.header_written {
            self.write_header()?;
        }
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<String> {
        vec!["Input".to_string(), "AI".to_string(), "Render".to_string()]
    }

    #[test]
    fn test_rows_follow_column_order() {
        let mut stats = FrameStats::new(4);
        let mut csv = CsvExporter::new(Vec::new(), columns());

        stats.record_section("Render", 3_250);
        stats.record_section("Input", 200);
        stats.add_sample(3_450, 16_667, 0);
        csv.on_frame(&stats, stats.frame(0)).unwrap();
        csv.finish(&stats).unwrap();

        assert_eq!(csv.rows(), 1);
        let text = String::from_utf8(csv.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Frame,Work(ms),Total(ms),Input(ms),AI(ms),Render(ms)");
        assert_eq!(lines[1], "0,3.450,16.667,0.200,0.000,3.250");
    }

    #[test]
    fn test_header_written_once() {
        let mut stats = FrameStats::new(4);
        let mut csv = CsvExporter::new(Vec::new(), columns());
        for index in 0..3 {
            stats.add_sample(1_000, 2_000, index);
            csv.on_frame(&stats, stats.frame(index)).unwrap();
        }
        csv.finish(&stats).unwrap();

        let text = String::from_utf8(csv.into_inner()).unwrap();
        assert_eq!(text.lines().count(), 4);
        assert_eq!(text.matches("Frame,").count(), 1);
    }

    #[test]
    fn test_empty_run_still_has_header() {
        let stats = FrameStats::new(4);
        let mut csv = CsvExporter::new(Vec::new(), columns());
        csv.finish(&stats).unwrap();
        let text = String::from_utf8(csv.into_inner()).unwrap();
        assert_eq!(text, "Frame,Work(ms),Total(ms),Input(ms),AI(ms),Render(ms)\n");
    }

    #[test]
    fn test_create_reports_bad_path() {
        let dir = std::env::temp_dir().join("frame_pacer_missing_dir_for_csv_test");
        let _ = std::fs::remove_dir_all(&dir);
        let result = CsvExporter::create(dir.join("out.csv"), columns());
        assert!(matches!(result, Err(ProfilerError::Report(_))));
    }
}
