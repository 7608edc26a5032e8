use std::io::{self, Write};

use documorph_core::{AppViewModel, ResultView};

const BAR_WIDTH: usize = 30;

/// Terminal stand-in for the upload page: a progress bar with its label, and
/// a result area. Elements that are absent are skipped silently.
pub struct TerminalSurface<W: Write> {
    out: W,
    progress_bar: bool,
    result_area: bool,
    base_url: String,
    shown_percent: Option<i64>,
    shown_result: ResultView,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, base_url: &str) -> Self {
        Self {
            out,
            progress_bar: true,
            result_area: true,
            base_url: base_url.trim_end_matches('/').to_string(),
            shown_percent: None,
            shown_result: ResultView::Empty,
        }
    }

    pub fn without_progress_bar(mut self) -> Self {
        self.progress_bar = false;
        self
    }

    #[cfg(test)]
    pub fn without_result_area(mut self) -> Self {
        self.result_area = false;
        self
    }

    /// Writes only what changed since the last call.
    pub fn render(&mut self, view: &AppViewModel) -> io::Result<()> {
        if self.progress_bar && self.shown_percent != Some(view.percent) {
            writeln!(
                self.out,
                "[{}] {}",
                bar(view.percent),
                view.progress_label
            )?;
            self.shown_percent = Some(view.percent);
        }

        if self.result_area && self.shown_result != view.result {
            match &view.result {
                ResultView::Empty => {}
                ResultView::Error(message) => writeln!(self.out, "error: {message}")?,
                ResultView::Download { url, label } => {
                    writeln!(self.out, "{label}: {}", self.absolute(url))?
                }
            }
            self.shown_result = view.result.clone();
        }
        self.out.flush()
    }

    pub fn note(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{line}")?;
        self.out.flush()
    }

    fn absolute(&self, url: &str) -> String {
        if url.starts_with('/') {
            format!("{}{url}", self.base_url)
        } else {
            url.to_string()
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

/// The drawn width is bounded; the label keeps the raw value.
fn bar(percent: i64) -> String {
    let filled = (percent.clamp(0, 100) as usize * BAR_WIDTH) / 100;
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use documorph_core::progress_label;

    fn view(percent: i64, result: ResultView) -> AppViewModel {
        AppViewModel {
            percent,
            progress_label: progress_label(percent),
            result,
            ..AppViewModel::default()
        }
    }

    fn output(surface: TerminalSurface<Vec<u8>>) -> String {
        String::from_utf8(surface.into_inner()).unwrap()
    }

    #[test]
    fn renders_progress_then_download_link() {
        let mut surface = TerminalSurface::new(Vec::new(), "http://localhost:5000/");
        surface.render(&view(40, ResultView::Empty)).unwrap();
        surface.render(&view(40, ResultView::Empty)).unwrap();
        surface
            .render(&view(
                100,
                ResultView::Download {
                    url: "/files/abc.pdf".to_string(),
                    label: "Download Result".to_string(),
                },
            ))
            .unwrap();

        let text = output(surface);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], format!("[{}{}] 40%", "#".repeat(12), ".".repeat(18)));
        assert_eq!(lines[1], format!("[{}] 100%", "#".repeat(30)));
        assert_eq!(
            lines[2],
            "Download Result: http://localhost:5000/files/abc.pdf"
        );
    }

    #[test]
    fn out_of_range_percent_keeps_raw_label() {
        let mut surface = TerminalSurface::new(Vec::new(), "http://h");
        surface
            .render(&view(-1, ResultView::Error("Invalid password".to_string())))
            .unwrap();
        let text = output(surface);
        assert!(text.contains("] -1%"));
        assert!(text.contains("error: Invalid password"));
    }

    #[test]
    fn missing_elements_are_skipped() {
        let mut surface = TerminalSurface::new(Vec::new(), "http://h").without_progress_bar();
        surface.render(&view(55, ResultView::Empty)).unwrap();
        surface
            .render(&view(55, ResultView::Error("boom".to_string())))
            .unwrap();
        assert_eq!(output(surface), "error: boom\n");

        let mut surface = TerminalSurface::new(Vec::new(), "http://h")
            .without_progress_bar()
            .without_result_area();
        surface
            .render(&view(100, ResultView::Error("boom".to_string())))
            .unwrap();
        assert_eq!(output(surface), "");
    }

    #[test]
    fn absolute_download_urls_are_left_alone() {
        let mut surface = TerminalSurface::new(Vec::new(), "http://h").without_progress_bar();
        surface
            .render(&view(
                100,
                ResultView::Download {
                    url: "https://cdn.example.com/a.zip".to_string(),
                    label: "Download Result".to_string(),
                },
            ))
            .unwrap();
        assert_eq!(
            output(surface),
            "Download Result: https://cdn.example.com/a.zip\n"
        );
    }
}
