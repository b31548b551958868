//! The strap's body chain: fixed anchor → links → card.

use crate::body::{BodyDesc, BodyHandle};
use crate::error::StrapError;
use crate::float::Float;
use crate::solver::RigidBodySolver;
use crate::vec::Vec3;
use alloc::vec::Vec as AllocVec;

/// Fewest and most links allowed between anchor and card.
pub const MIN_LINKS: usize = 2;
pub const MAX_LINKS: usize = 3;

/// Layout and mass properties of a chain, in the frame of `origin`.
#[derive(Clone, Debug)]
pub struct ChainSpec<F: Float> {
    /// World position all other positions are relative to.
    pub origin: Vec3<F>,
    pub anchor: Vec3<F>,
    /// Link start positions, anchor side first.
    pub links: AllocVec<Vec3<F>>,
    pub card: Vec3<F>,
    /// Rope length from the anchor to the first link, then between links.
    pub rope_lengths: AllocVec<F>,
    /// Where the last link attaches on the card, in the card's local frame.
    pub card_attachment: Vec3<F>,
    /// Half extents of the card's box, used for picking.
    pub card_half_extents: Vec3<F>,
    pub link_mass: F,
    pub card_mass: F,
    pub card_inertia: F,
    pub linear_damping: F,
    pub angular_damping: F,
}

impl<F: Float> ChainSpec<F> {
    /// Straight horizontal chain from `origin`: links every `spacing` along +X,
    /// card one spacing past the last link, ropes as long as the spacing.
    pub fn straight(origin: Vec3<F>, links: usize, spacing: F) -> Self {
        let step = |i: usize| Vec3::new(spacing * F::from_f32(i as f32), F::zero(), F::zero());
        ChainSpec {
            origin,
            anchor: Vec3::zero(),
            links: (1..=links).map(step).collect(),
            card: step(links + 1),
            rope_lengths: (0..links).map(|_| spacing).collect(),
            card_attachment: Vec3::new(F::zero(), F::from_f32(1.45), F::zero()),
            card_half_extents: Vec3::from_f32([0.8, 1.125, 0.01]),
            link_mass: F::one(),
            card_mass: F::one(),
            card_inertia: F::one(),
            linear_damping: F::two(),
            angular_damping: F::two(),
        }
    }

    pub fn with_card_attachment(mut self, attachment: Vec3<F>) -> Self {
        self.card_attachment = attachment;
        self
    }

    pub fn with_damping(mut self, linear: F, angular: F) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    pub fn validate(&self) -> Result<(), StrapError> {
        let links = self.links.len();
        if !(MIN_LINKS..=MAX_LINKS).contains(&links) || self.rope_lengths.len() != links {
            return Err(StrapError::InvalidChainLength { links });
        }
        if self.rope_lengths.iter().any(|l| !(l.is_finite() && *l > F::zero())) {
            return Err(StrapError::InvalidLength);
        }
        Ok(())
    }
}

/// Handles of a built chain. Joint graph is the path
/// anchor → links[0] → … → links[n-1] → card.
#[derive(Clone, Debug, PartialEq)]
pub struct Chain<F: Float> {
    anchor: BodyHandle,
    links: AllocVec<BodyHandle>,
    card: BodyHandle,
    card_attachment: Vec3<F>,
    card_half_extents: Vec3<F>,
}

impl<F: Float> Chain<F> {
    /// Create the chain's bodies and joints in `solver`. On failure nothing
    /// is left behind.
    pub fn build<S: RigidBodySolver<F>>(spec: &ChainSpec<F>, solver: &mut S) -> Result<Self, StrapError> {
        spec.validate()?;
        let mut created: AllocVec<BodyHandle> = AllocVec::with_capacity(spec.links.len() + 2);
        match Self::build_into(spec, solver, &mut created) {
            Ok(chain) => Ok(chain),
            Err(e) => {
                for h in created {
                    solver.remove_body(h);
                }
                Err(e)
            }
        }
    }

    fn build_into<S: RigidBodySolver<F>>(
        spec: &ChainSpec<F>,
        solver: &mut S,
        created: &mut AllocVec<BodyHandle>,
    ) -> Result<Self, StrapError> {
        let track = |h: BodyHandle, created: &mut AllocVec<BodyHandle>| {
            created.push(h);
            h
        };

        let anchor = solver.create_body(BodyDesc::fixed(spec.origin + spec.anchor))?;
        let anchor = track(anchor, created);

        let mut links = AllocVec::with_capacity(spec.links.len());
        for local in &spec.links {
            let desc = BodyDesc::dynamic(spec.origin + *local, spec.link_mass)
                .with_damping(spec.linear_damping, spec.angular_damping);
            let link = solver.create_body(desc)?;
            links.push(track(link, created));
        }

        let card_desc = BodyDesc::dynamic(spec.origin + spec.card, spec.card_mass)
            .with_inertia(spec.card_inertia)
            .with_damping(spec.linear_damping, spec.angular_damping);
        let card = solver.create_body(card_desc)?;
        let card = track(card, created);

        let mut previous = anchor;
        for (link, length) in links.iter().zip(&spec.rope_lengths) {
            solver.create_rope_joint(previous, *link, Vec3::zero(), Vec3::zero(), *length)?;
            previous = *link;
        }
        solver.create_spherical_joint(previous, card, Vec3::zero(), spec.card_attachment)?;

        log::debug!("built chain with {} links", links.len());
        Ok(Chain {
            anchor,
            links,
            card,
            card_attachment: spec.card_attachment,
            card_half_extents: spec.card_half_extents,
        })
    }

    pub fn anchor(&self) -> BodyHandle {
        self.anchor
    }

    pub fn card(&self) -> BodyHandle {
        self.card
    }

    /// Links, anchor side first.
    pub fn links(&self) -> &[BodyHandle] {
        &self.links
    }

    /// The link the card hangs from.
    pub fn card_side_link(&self) -> BodyHandle {
        self.links[self.links.len() - 1]
    }

    /// Every body in the chain, card first.
    pub fn bodies(&self) -> impl Iterator<Item = BodyHandle> + '_ {
        core::iter::once(self.card)
            .chain(self.links.iter().rev().copied())
            .chain(core::iter::once(self.anchor))
    }

    pub fn card_attachment(&self) -> Vec3<F> {
        self.card_attachment
    }

    pub fn card_half_extents(&self) -> Vec3<F> {
        self.card_half_extents
    }

    /// Remove every body (and with them every joint) from the solver.
    pub fn release<S: RigidBodySolver<F>>(self, solver: &mut S) {
        for h in self.bodies() {
            solver.remove_body(h);
        }
    }
}
