use std::fmt;

/// One loop construct, both of its jump targets derive from this id
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label(usize);

impl Label {
    pub fn id(&self) -> usize {
        self.0
    }

    /// Marks the point just after the opening `jz`
    pub fn begin(&self) -> String {
        format!(".LB{}", self.0)
    }

    /// Marks the point just after the closing `jnz`
    pub fn end(&self) -> String {
        format!(".LE{}", self.0)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Default)]
pub struct LabelAllocator {
    counter: usize,
}

impl LabelAllocator {
    pub fn new() -> LabelAllocator {
        LabelAllocator { counter: 0 }
    }

    /// Ids start at 1 and are never reused
    pub fn next(&mut self) -> Label {
        self.counter += 1;
        Label(self.counter)
    }

    pub fn allocated(&self) -> usize {
        self.counter
    }
}
