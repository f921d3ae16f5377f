//! lexically scoped variables defined with `set`
use indexmap::IndexMap;

/// Stack of variable frames, innermost last
///
/// Opening a block pushes an empty frame, closing it drops the frame again so definitions never leak to parents or
/// siblings. The root frame is never dropped.
#[derive(Debug)]
pub struct Scopes {
    frames: Vec<IndexMap<String, String>>,
}

impl Default for Scopes {
    fn default() -> Self {
        Self {
            frames: vec![IndexMap::new()],
        }
    }
}

impl Scopes {
    pub fn open(&mut self) {
        self.frames.push(IndexMap::new());
    }

    pub fn close(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Defines `name` in the innermost frame
    pub fn define(&mut self, name: &str, value: &str) {
        tracing::trace!(name, value, depth = self.depth(), "define variable");
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.to_string(), value.to_string());
        }
    }

    /// Looks `name` up from the innermost to the outermost frame
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(name))
            .map(String::as_str)
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn shadowing() {
        let mut scopes = Scopes::default();
        scopes.define("x", "1");
        scopes.define("y", "outer");

        scopes.open();
        scopes.define("x", "2");
        assert_eq!(scopes.resolve("x"), Some("2"));
        assert_eq!(scopes.resolve("y"), Some("outer"));
        scopes.close();

        assert_eq!(scopes.resolve("x"), Some("1"));
        assert_eq!(scopes.resolve("z"), None);
    }

    #[test]
    fn root_frame_survives() {
        let mut scopes = Scopes::default();
        scopes.define("x", "1");
        scopes.close();
        assert_eq!(scopes.depth(), 1);
        assert_eq!(scopes.resolve("x"), Some("1"));
    }
}
