use pretty::DocAllocator;

use super::types::*;

pub trait BracesExt<'a> {
    fn braces_anno(self) -> Builder<'a>;
}

impl<'a> BracesExt<'a> for Builder<'a> {
    fn braces_anno(self) -> Builder<'a> {
        let alloc = self.0;
        let open = alloc.text("{").annotate(Anno::BraceOpen);
        let close = alloc.text("}").annotate(Anno::BraceClose);
        open.append(self).append(close)
    }
}

pub trait BackslashExt<'a> {
    fn backslash_anno(&'a self, cfg: &PrintCfg) -> Builder<'a>;
}

impl<'a> BackslashExt<'a> for Alloc<'a> {
    fn backslash_anno(&'a self, _cfg: &PrintCfg) -> Builder<'a> {
        self.text(crate::tokens::LAMBDA).annotate(Anno::Backslash)
    }
}

pub trait IsNilExt {
    fn is_nil(&self) -> bool;
}

impl IsNilExt for Builder<'_> {
    fn is_nil(&self) -> bool {
        matches!(*self.1, pretty::Doc::Nil)
    }
}
