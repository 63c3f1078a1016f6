use ast::HashSet;

/// How chatty the checker is about its intermediate steps.
/// `CurrOnly` silences tracing while imported modules are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    #[default]
    None,
    CurrOnly,
    Full,
}

/// The checker context. This collects the handful of pieces of mutable
/// state the checking process needs — which definitions the reducer may
/// unfold, which it actually unfolded, counters for fresh names and
/// rewrites — so that independent checkers can coexist in one process.
#[derive(Debug, Default)]
pub struct Ctx {
    /// Unfold every definition during reduction.
    pub reduce_all: bool,
    /// Definitions (by canonical name) the reducer may unfold.
    reduce_only: Vec<String>,
    /// Names the reducer actually unfolded since the last reset. Callers
    /// that require a targeted unfolding to fire inspect this set.
    pub reduced_defs: HashSet<String>,
    /// Rewrites performed since the last reset.
    pub num_rewrites: usize,
    name_id: u64,
    label_count: u64,
    pub verbosity: Verbosity,
}

impl Ctx {
    pub fn new() -> Ctx {
        Ctx::default()
    }

    /// A globally fresh canonical name with the given base.
    pub fn fresh_name(&mut self, base: &str) -> String {
        let base = match base.find(ast::DISAMBIGUATOR) {
            Some(pos) => &base[..pos],
            None => base,
        };
        let id = self.name_id;
        self.name_id += 1;
        format!("{base}{}{id}", ast::DISAMBIGUATOR)
    }

    pub fn reset_labels(&mut self) {
        self.label_count = 1;
    }

    /// A fresh case label for rendered advice.
    pub fn fresh_label(&mut self) -> String {
        let label = format!("label_{}", self.label_count);
        self.label_count += 1;
        label
    }

    /// Whether the reducer may unfold the definition with this name.
    pub fn defs_enabled(&self, name: &str) -> bool {
        self.reduce_all || self.reduce_only.iter().any(|def| def == name)
    }

    pub fn record_reduced(&mut self, name: &str) {
        self.reduced_defs.insert(name.to_owned());
    }

    pub fn reset_reduced_defs(&mut self) {
        self.reduced_defs.clear();
    }

    pub fn reset_rewrites(&mut self) {
        self.num_rewrites = 0;
    }

    /// Run `f` with additional definitions enabled for reduction. The
    /// previous set is restored when `f` returns, whether it succeeded or
    /// not.
    pub fn with_defs_enabled<T>(
        &mut self,
        defs: Vec<String>,
        f: impl FnOnce(&mut Ctx) -> T,
    ) -> T {
        let old_len = self.reduce_only.len();
        self.reduce_only.extend(defs);
        let result = f(self);
        self.reduce_only.truncate(old_len);
        result
    }

    /// Run `f` with every definition enabled for reduction.
    pub fn with_reduce_all<T>(&mut self, f: impl FnOnce(&mut Ctx) -> T) -> T {
        let old = self.reduce_all;
        self.reduce_all = true;
        let result = f(self);
        self.reduce_all = old;
        result
    }

    pub fn trace(&self, msg: impl FnOnce() -> String) {
        if self.verbosity != Verbosity::None {
            log::trace!("{}", msg());
        }
    }
}
