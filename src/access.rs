//! Placeholder access gates.
//!
//! Neither gate is a security boundary; the check is an injected predicate so
//! a deployment can swap in something real without touching call sites.

use tracing::info;

/// Decides whether an input unlocks a gate.
pub trait AccessCheck<I: ?Sized>: Send + Sync {
  fn check_access(&self, input: &I) -> bool;
}

impl<I: ?Sized, F> AccessCheck<I> for F
where
  F: Fn(&I) -> bool + Send + Sync,
{
  fn check_access(&self, input: &I) -> bool {
    self(input)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Credentials {
  pub username: String,
  pub password: String,
}

pub fn static_credentials(expected: Credentials) -> impl AccessCheck<Credentials> {
  move |given: &Credentials| *given == expected
}

pub fn static_passcode(expected: String) -> impl AccessCheck<str> {
  move |given: &str| given == expected
}

/// Two-state gate: content is shown only after a successful check. A failed
/// attempt leaves an inline message; retries are unlimited.
pub struct Gate<I: ?Sized> {
  name: &'static str,
  check: Box<dyn AccessCheck<I>>,
  open: bool,
  rejection: Option<&'static str>,
  rejection_message: &'static str,
}

impl<I: ?Sized> Gate<I> {
  pub fn new(name: &'static str, check: impl AccessCheck<I> + 'static, rejection_message: &'static str) -> Self {
    Self { name, check: Box::new(check), open: false, rejection: None, rejection_message }
  }

  pub fn attempt(&mut self, input: &I) -> bool {
    if self.check.check_access(input) {
      self.open = true;
      self.rejection = None;
      info!(gate = self.name, "access: gate opened");
    } else {
      self.rejection = Some(self.rejection_message);
      info!(gate = self.name, "access: attempt rejected");
    }
    self.open
  }

  pub fn is_open(&self) -> bool {
    self.open
  }

  pub fn lock(&mut self) {
    self.open = false;
    self.rejection = None;
  }

  pub fn rejection(&self) -> Option<&'static str> {
    self.rejection
  }
}
