use codespan::Span;
use miette::SourceSpan;

/// Convert the source spans attached to AST nodes into the
/// representation that `miette` diagnostics expect.
pub trait ToMiette {
    type Target;

    fn to_miette(&self) -> Self::Target;
}

impl ToMiette for Span {
    type Target = SourceSpan;

    fn to_miette(&self) -> Self::Target {
        let start: usize = self.start().to_usize();
        let len: usize = self.end().to_usize() - start;
        SourceSpan::new(start.into(), len)
    }
}

impl<T: ToMiette> ToMiette for Option<T> {
    type Target = Option<T::Target>;

    fn to_miette(&self) -> Self::Target {
        self.as_ref().map(ToMiette::to_miette)
    }
}
