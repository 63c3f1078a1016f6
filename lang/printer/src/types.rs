use pretty::{DocAllocator, DocBuilder};

use crate::DEFAULT_WIDTH;
use crate::render;

/// Annotations on the output document which can be rendered
/// differently by the various backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anno {
    Keyword,
    Ctor,
    Type,
    Comment,
    Backslash,
    BraceOpen,
    BraceClose,
    Error,
}

pub type Alloc<'a> = pretty::Arena<'a, Anno>;
pub type Builder<'a> = DocBuilder<'a, Alloc<'a>, Anno>;

/// Operator precedence used to decide where parentheses are needed.
/// `0` is the loosest level; higher levels bind tighter.
pub type Precedence = u32;

#[derive(Debug, Clone)]
pub struct PrintCfg {
    /// The width of the output terminal/device
    pub width: usize,
    /// How many spaces of indentation are used
    pub indent: isize,
    /// Whether to annotate variables with their De Bruijn index
    pub de_bruijn: bool,
}

impl Default for PrintCfg {
    fn default() -> Self {
        PrintCfg { width: DEFAULT_WIDTH, indent: crate::tokens::INDENT, de_bruijn: false }
    }
}

pub trait Print {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        self.print_prec(cfg, alloc, 0)
    }

    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        self.print(cfg, alloc)
    }

    /// Render the document to a plain string, mostly used in
    /// error messages and tests.
    fn print_to_string(&self, cfg: Option<&PrintCfg>) -> String {
        let alloc = Alloc::new();
        let default_cfg = PrintCfg::default();
        let cfg = cfg.unwrap_or(&default_cfg);
        let doc = self.print(cfg, &alloc);
        let mut buf = Vec::new();
        render::render_plain(&doc, cfg.width, &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl<T: Print> Print for Box<T> {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        (**self).print(cfg, alloc)
    }

    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        (**self).print_prec(cfg, alloc, prec)
    }
}

impl<T: Print> Print for Option<T> {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        match self {
            Some(inner) => inner.print(cfg, alloc),
            None => alloc.nil(),
        }
    }
}

impl<T: Print> Print for Vec<T> {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        crate::print_comma_separated(self, cfg, alloc)
    }
}
