use std::convert::TryInto;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// An address into `SourceFiles`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Offset(pub u32);

impl Offset {
    #[inline]
    pub fn to_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn to_usize(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn add(self, n: u32) -> Offset {
        Offset(self.0 + n)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: Offset,
    pub length: Offset,
}

impl Span {
    #[inline]
    pub fn end(&self) -> Offset {
        self.start.add(self.length.to_u32())
    }
}

pub struct SourceFile {
    pub name: String,
    pub start: Offset,
    pub content: String,
}

/// A single line of a `SourceFile`. `number` is 1-based, `offset` is the address of the line's
/// first byte.
pub struct Line<'src> {
    pub number: u32,
    pub offset: Offset,
    pub content: &'src str,
}

impl SourceFile {
    pub fn end(&self) -> Offset {
        self.start.add(self.content.len() as u32)
    }

    #[inline]
    pub fn contains(&self, offset: Offset) -> bool {
        self.start <= offset && offset <= self.end()
    }

    /// The 1-based number of the line that contains `offset`.
    pub fn line_number(&self, offset: Offset) -> u32 {
        let local = offset.to_usize() - self.start.to_usize();
        let upto = local.min(self.content.len());
        1 + self.content.as_bytes()[..upto]
            .iter()
            .filter(|b| **b == b'\n')
            .count() as u32
    }

    pub fn get_line(&self, offset: Offset) -> Line<'_> {
        let local = (offset.to_usize() - self.start.to_usize()).min(self.content.len());
        let line_start = match self.content[..local].rfind('\n') {
            Option::None => 0,
            Option::Some(ix) => ix + 1,
        };
        let line_end = match self.content[local..].find('\n') {
            Option::None => self.content.len(),
            Option::Some(ix) => local + ix,
        };
        Line {
            number: self.line_number(offset),
            offset: self.start.add(line_start as u32),
            content: &self.content[line_start..line_end],
        }
    }
}

pub struct SourceFiles {
    next_addr: Offset,
    files: Vec<SourceFile>,
}

#[inline]
fn __open_and_read(path: &Path, mut content: &mut String) -> std::io::Result<usize> {
    let mut file = File::open(path)?;
    file.read_to_string(&mut content)
}

impl SourceFiles {
    #[inline]
    pub fn new() -> Self {
        SourceFiles {
            next_addr: Offset(0),
            files: Vec::new(),
        }
    }

    #[inline]
    fn __new_source_file(&mut self, name: String, size: usize, content: String) -> Offset {
        let start = self.next_addr;
        // one past the end, so that an end-of-input offset still belongs to this file
        let size: u32 = TryInto::<u32>::try_into(size).unwrap_or(u32::MAX - 1);
        self.next_addr.0 = self.next_addr.0.saturating_add(size + 1);
        let src_file = SourceFile {
            name,
            start,
            content,
        };
        self.files.push(src_file);
        start
    }

    pub fn new_source_file(&mut self, name: String, content: String) -> (Offset, String) {
        let offset = self.__new_source_file(name.clone(), content.len(), content);
        (offset, name)
    }

    pub fn load_source_file(&mut self, path: &Path) -> std::io::Result<(Offset, String)> {
        let mut content = String::new();
        let size = __open_and_read(path, &mut content)?;
        let name = path.to_string_lossy().to_string();
        let offset = self.__new_source_file(name.clone(), size, content);
        Result::Ok((offset, name))
    }

    pub fn get_by_name(&self, name: &str) -> Option<&SourceFile> {
        self.files.iter().find(|file| file.name == name)
    }

    pub fn get_by_offset(&self, offset: Offset) -> Option<&SourceFile> {
        self.files.iter().find(|file| file.contains(offset))
    }
}

impl Default for SourceFiles {
    fn default() -> Self {
        Self::new()
    }
}

#[test]
fn test_get_line1() {
    let mut src_files = SourceFiles::new();
    src_files.new_source_file(
        String::from("test"),
        String::from("let x = 1\nin Print x\n"),
    );
    let src_file = src_files.get_by_name("test").unwrap();
    let line = src_file.get_line(Offset(13));
    assert_eq!(line.number, 2);
    assert_eq!(line.offset, Offset(10));
    assert_eq!(line.content, "in Print x");
}

#[test]
fn test_get_by_offset1() {
    let mut src_files = SourceFiles::new();
    let (first, _) = src_files.new_source_file(String::from("a"), String::from("abc"));
    let (second, _) = src_files.new_source_file(String::from("b"), String::from("defg"));
    assert_eq!(first, Offset(0));
    assert_eq!(second, Offset(4));
    assert_eq!(src_files.get_by_offset(Offset(3)).unwrap().name, "a");
    assert_eq!(src_files.get_by_offset(Offset(5)).unwrap().name, "b");
    assert_eq!(src_files.get_by_offset(Offset(8)).unwrap().name, "b");
}
