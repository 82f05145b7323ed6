//! Named view projections of result types.
//!
//! A result type declares a [`ViewSet`]: its `default` view (every
//! top-level attribute) and any number of partial views. Each [`View`] lists
//! the attributes it carries and which of those are mandatory.
//!
//! The projected shape of a result is a separate type implementing
//! [`Projection`], with every attribute optional. [`Viewed`] pairs such a
//! value with the name of the view it was rendered in, so it can be
//! validated against that view's mandatory attributes and turned back into
//! the full result.
//!
//! View sets are `static` data and never change once the program starts.

use crate::validate::{ValidationError, ValidationErrors, Validator};

/// Name of the view every result type declares.
pub const DEFAULT_VIEW: &str = "default";

/// Response header naming the view a result was rendered in.
pub const VIEW_HEADER: &str = "x-view";

/// A named, partial attribute subset of a result type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct View {
    name: &'static str,
    attributes: &'static [&'static str],
    mandatory: &'static [&'static str],
}

impl View {
    /// Declare a view.
    #[must_use]
    pub const fn new(
        name: &'static str,
        attributes: &'static [&'static str],
        mandatory: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            attributes,
            mandatory,
        }
    }

    /// View name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Attributes carried by this view, in declaration order.
    #[must_use]
    pub const fn attributes(&self) -> &'static [&'static str] {
        self.attributes
    }

    /// Attributes that must be present for a value rendered in this view.
    #[must_use]
    pub const fn mandatory(&self) -> &'static [&'static str] {
        self.mandatory
    }

    /// Returns `true` if the view carries `attribute`.
    #[must_use]
    pub fn includes(&self, attribute: &str) -> bool {
        self.attributes.contains(&attribute)
    }

    /// A copy of a required attribute when the view carries it.
    #[must_use]
    pub fn carry<T: Clone>(&self, attribute: &str, value: &T) -> Option<T> {
        self.includes(attribute).then(|| value.clone())
    }

    /// A copy of an optional attribute when the view carries it.
    #[must_use]
    pub fn carry_optional<T: Clone>(&self, attribute: &str, value: Option<&T>) -> Option<T> {
        value.filter(|_| self.includes(attribute)).cloned()
    }
}

/// Every view declared for one result type.
///
/// The first view is the default one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSet {
    type_name: &'static str,
    views: &'static [View],
}

impl ViewSet {
    /// Declare the views of `type_name`; `views[0]` must be `default`.
    #[must_use]
    pub const fn new(type_name: &'static str, views: &'static [View]) -> Self {
        Self { type_name, views }
    }

    /// Name of the result type.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Declared view names, `default` first.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.views.iter().map(View::name).collect()
    }

    /// The default view.
    #[must_use]
    pub fn default_view(&self) -> &'static View {
        const EMPTY: &View = &View::new(DEFAULT_VIEW, &[], &[]);
        self.views.first().unwrap_or(EMPTY)
    }

    /// Resolve a requested view name; `None` selects the default view.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidEnumValue`] naming the offending
    /// view and every valid name when `name` is not declared.
    pub fn resolve(&self, name: Option<&str>) -> Result<&'static View, ValidationError> {
        let Some(name) = name else {
            return Ok(self.default_view());
        };
        self.views.iter().find(|view| view.name == name).ok_or_else(|| {
            ValidationError::InvalidEnumValue {
                field: "view".to_string(),
                value: name.to_string(),
                allowed: self.names(),
            }
        })
    }

    /// Check the declaration invariants: the first view is `default`, every
    /// other view only carries attributes of the default view, and every
    /// mandatory attribute is carried by its view.
    ///
    /// # Errors
    ///
    /// Returns a description of the first broken invariant.
    pub fn check(&self) -> Result<(), String> {
        let default = self.default_view();
        if default.name != DEFAULT_VIEW {
            return Err(format!("{}: first view must be \"default\"", self.type_name));
        }
        for view in self.views {
            if let Some(extra) = view.attributes.iter().find(|a| !default.includes(a)) {
                return Err(format!(
                    "{}: view {:?} carries {extra:?} which the default view does not",
                    self.type_name, view.name
                ));
            }
            if let Some(missing) = view.mandatory.iter().find(|a| !view.includes(a)) {
                return Err(format!(
                    "{}: view {:?} marks {missing:?} mandatory but does not carry it",
                    self.type_name, view.name
                ));
            }
        }
        Ok(())
    }
}

/// The projected (all-optional) shape of a full result type.
pub trait Projection: Sized {
    /// The full result type.
    type Full;

    /// Views declared for the full type.
    const VIEWS: &'static ViewSet;

    /// Copy the attributes `view` carries out of `full`; the others stay absent.
    fn project(full: &Self::Full, view: &View) -> Self;

    /// Rebuild the full result. Attributes absent here are absent (or empty
    /// for required scalars) in the result.
    fn unproject(self) -> Self::Full;

    /// Returns `true` if `attribute` is set on this projection.
    fn is_present(&self, attribute: &str) -> bool;

    /// Checks on present attributes (formats, nested structures), run
    /// after the presence checks.
    fn validate_attributes(&self, validator: &mut Validator) {
        let _ = validator;
    }
}

/// A projection together with the view it was rendered in.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewed<P> {
    /// The projected value.
    pub projected: P,
    /// View name.
    pub view: &'static str,
}

impl<P: Projection> Viewed<P> {
    /// Project `full` into the named view (`None` = default).
    ///
    /// # Errors
    ///
    /// Fails with an invalid enum value error for an undeclared view.
    pub fn project(full: &P::Full, view: Option<&str>) -> Result<Self, ValidationError> {
        let view = P::VIEWS.resolve(view)?;
        Ok(Self {
            projected: P::project(full, view),
            view: view.name(),
        })
    }

    /// Wrap a projection received over the wire, rendered in the named view.
    ///
    /// # Errors
    ///
    /// Fails with an invalid enum value error for an undeclared view.
    pub fn received(projected: P, view: Option<&str>) -> Result<Self, ValidationError> {
        let view = P::VIEWS.resolve(view)?;
        Ok(Self {
            projected,
            view: view.name(),
        })
    }

    /// Check the mandatory attributes of the active view, then the
    /// attribute constraints.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(P::VIEWS.type_name());
        match P::VIEWS.resolve(Some(self.view)) {
            Ok(view) => {
                for attribute in view.mandatory() {
                    v.require_present(attribute, self.projected.is_present(attribute));
                }
            }
            Err(err) => {
                v.merge(Err(err.into()));
            }
        }
        self.projected.validate_attributes(&mut v);
        v.finish()
    }

    /// Rebuild the full result.
    pub fn into_full(self) -> P::Full {
        self.projected.unproject()
    }
}
