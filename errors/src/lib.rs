use span::{Offset, SourceFiles, Span};
use std::io;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    Point(Offset),
    Span(Span),
}

impl Highlight {
    #[inline]
    pub fn start(&self) -> Offset {
        match self {
            Highlight::Point(start) => *start,
            Highlight::Span(span) => span.start,
        }
    }

    #[inline]
    pub fn len(&self) -> Offset {
        match self {
            Highlight::Point(_) => Offset(1),
            Highlight::Span(span) => span.length,
        }
    }

    #[inline]
    pub fn end(&self) -> Offset {
        self.start().add(self.len().to_u32())
    }
}

/// A diagnostic that points into a source file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    pub highlight: Highlight,
    pub message: String,
}

fn highlight(line: &str, line_offset: Offset, region: Highlight) -> String {
    let mut string = String::new();
    let mut pos: usize = 0;
    let start_offset = region.start().to_usize().saturating_sub(line_offset.to_usize());
    let end_offset = region.end().to_usize().saturating_sub(line_offset.to_usize());
    match region {
        Highlight::Point(_) => {
            for c in line.chars() {
                if pos == start_offset {
                    break;
                }
                string.push(' ');
                pos += c.len_utf8();
            }
            string.push('^');
        }
        Highlight::Span(_) => {
            for c in line.chars() {
                if pos >= end_offset {
                    break;
                } else if pos >= start_offset {
                    string.push('^')
                } else {
                    string.push(' ')
                }
                pos += c.len_utf8();
            }
            if start_offset >= line.len() {
                // the span starts at the end of the line (end of input)
                string.push('^');
            }
        }
    }
    string
}

pub fn __build_report(src_files: &SourceFiles, error: &Error) -> [String; 5] {
    let error_start = error.highlight.start();
    let src_file = match src_files.get_by_offset(error_start) {
        Option::None => {
            return [
                String::from("<unknown>\n"),
                String::from(" |\n"),
                String::from(" |\n"),
                String::from(" |\n"),
                format!("{}\n", error.message),
            ]
        }
        Option::Some(src_file) => src_file,
    };
    let line = src_file.get_line(error_start);
    let highlight = highlight(line.content, line.offset, error.highlight);

    let line_number_string = line.number.to_string();
    let line_number_padding: String = line_number_string.chars().map(|_| ' ').collect();

    let line0 = format!("{}:{}\n", src_file.name, line.number);
    let line1 = format!("{} |\n", line_number_padding);
    let line2 = format!("{} | {}\n", line_number_string, line.content);
    let line3 = format!("{} | {}\n", line_number_padding, highlight);
    let line4 = format!("{}\n", error.message);

    [line0, line1, line2, line3, line4]
}

impl Error {
    pub fn report<W: Write>(&self, src_files: &SourceFiles, out: &mut W) -> io::Result<()> {
        for line in __build_report(src_files, self).iter() {
            out.write_all(line.as_bytes())?;
        }
        out.flush()
    }
}

#[cfg(test)]
use pretty_assertions::assert_eq;

#[test]
fn test_build_report1() {
    let mut src_files = SourceFiles::new();
    src_files.new_source_file(
        String::from("test"),
        String::from("let x = 1\nin x + ;"),
    );

    assert_eq!(
        __build_report(
            &src_files,
            &Error {
                highlight: Highlight::Point(Offset(17)),
                message: String::from("Message")
            }
        ),
        [
            "test:2\n",
            "  |\n",
            "2 | in x + ;\n",
            "  |        ^\n",
            "Message\n"
        ]
    )
}

#[test]
fn test_build_report2() {
    let mut src_files = SourceFiles::new();

    let mut prefix = String::from("1\n2\n3\n4\n5\n6\n7\n8\n9\n10\nlet x = ");
    let suffix = "'abc";
    let aim = prefix.len();
    prefix += suffix;

    src_files.new_source_file(String::from("test"), prefix);

    assert_eq!(
        __build_report(
            &src_files,
            &Error {
                highlight: Highlight::Span(Span {
                    start: Offset(aim as u32),
                    length: Offset(4)
                }),
                message: String::from("Unterminated string")
            }
        ),
        [
            "test:11\n",
            "   |\n",
            "11 | let x = 'abc\n",
            "   |         ^^^^\n",
            "Unterminated string\n"
        ]
    )
}
