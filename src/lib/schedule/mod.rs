//! Scheduling heuristics.
//!
//! Every family is a closed set of variants. Selections are pure functions of
//! the queue contents they are given and never mutate the simulation.

use std::fmt;

use {Error, Result};

macro_rules! heuristic(
    ($(#[$attr:meta])* pub enum $name:ident {
        $($(#[$variant_attr:meta])* $variant:ident => ($long:expr, $short:expr),)+
    }) => (
        $(#[$attr])*
        #[derive(Clone, Copy, Debug, Eq, PartialEq)]
        pub enum $name {
            $($(#[$variant_attr])* $variant,)+
        }

        impl $name {
            /// Return the descriptive name.
            pub fn name(&self) -> &'static str {
                match *self {
                    $($name::$variant => $long,)+
                }
            }

            /// Return the abbreviated name.
            pub fn abbreviation(&self) -> &'static str {
                match *self {
                    $($name::$variant => $short,)+
                }
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = ::Error;

            fn from_str(name: &str) -> ::Result<Self> {
                $(
                    if name.eq_ignore_ascii_case($long) || name.eq_ignore_ascii_case($short) {
                        return Ok($name::$variant);
                    }
                )+
                raise!("found an unknown {} heuristic ({:?})", stringify!($name).to_lowercase(),
                       name)
            }
        }

        impl ::std::fmt::Display for $name {
            #[inline]
            fn fmt(&self, formatter: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                formatter.write_str(self.abbreviation())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
                where D: ::serde::Deserializer<'de>
            {
                use serde::de::Error;
                let name = String::deserialize(deserializer)?;
                name.parse().map_err(|error: ::Error| D::Error::custom(error))
            }
        }
    );
);

mod cpu;
mod gpu;

pub use self::cpu::{Allocation, Dispatch};
pub use self::gpu::{Placement, Selection, earliest_deadline};

/// A complete mapping policy.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Policy {
    /// The choice of a thread for a ready task.
    pub allocation: Allocation,
    /// The choice of a task from an allocation queue.
    pub dispatch: Dispatch,
    /// The GPU queueing discipline.
    pub discipline: Discipline,
}

/// A GPU queueing discipline.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Discipline {
    /// A global earliest-deadline-first pool in front of per-device FIFO
    /// queues, admitting at most as many tasks as there are threads.
    Locking,
    /// A global queue in front of per-device local queues.
    Queueing {
        /// The choice of a task from the global queue.
        selection: Selection,
        /// The choice of a local queue for that task.
        placement: Placement,
        /// The choice of a task from a local queue.
        ordering: Selection,
    },
}

impl Discipline {
    /// Create a discipline from the name of the variant and, for the queueing
    /// one, the names of its three heuristics.
    pub fn new(name: &str, selection: Option<&str>, placement: Option<&str>,
               ordering: Option<&str>) -> Result<Discipline> {
        match &*name.to_lowercase() {
            "locking" | "o-kglp" => Ok(Discipline::Locking),
            "queueing" => Ok(Discipline::Queueing {
                selection: some!(selection, "a global-selection heuristic is required").parse()?,
                placement: some!(placement, "a local-allocation heuristic is required").parse()?,
                ordering: some!(ordering, "a local-dispatch heuristic is required").parse()?,
            }),
            _ => Err(Error::new(format!("found an unknown GPU discipline ({:?})", name))),
        }
    }
}

/// Return the position of the first smallest value.
fn minimum<T: PartialOrd, I: Iterator<Item = T>>(values: I) -> usize {
    best(values, |value, best| value < best)
}

/// Return the position of the first largest value.
fn maximum<T: PartialOrd, I: Iterator<Item = T>>(values: I) -> usize {
    best(values, |value, best| value > best)
}

fn best<T, I, F>(values: I, better: F) -> usize
    where I: Iterator<Item = T>, F: Fn(&T, &T) -> bool
{
    let mut chosen: Option<(usize, T)> = None;
    for (i, value) in values.enumerate() {
        let replace = match chosen {
            Some((_, ref best)) => better(&value, best),
            _ => true,
        };
        if replace {
            chosen = Some((i, value));
        }
    }
    chosen.map(|(i, _)| i).unwrap_or(0)
}

impl fmt::Display for Policy {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}-{},{}", self.allocation, self.dispatch, self.discipline)
    }
}

impl fmt::Display for Discipline {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Discipline::Locking => write!(formatter, "O-KGLP"),
            Discipline::Queueing { selection, placement, ordering } => {
                write!(formatter, "{}-{}-{}", selection, placement, ordering)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Allocation, Discipline, Dispatch, Placement, Policy, Selection};

    #[test]
    fn parse() {
        assert_eq!("MTET".parse::<Allocation>().unwrap(), Allocation::MinTotalQueuedExecTime);
        assert_eq!("round-robin".parse::<Allocation>().unwrap(), Allocation::RoundRobin);
        assert_eq!("mcd".parse::<Dispatch>().unwrap(), Dispatch::WeightedCost);
        assert_eq!("WSM".parse::<Placement>().unwrap(), Placement::WeightedSum);
        assert_eq!("max-descendant-count".parse::<Selection>().unwrap(),
                   Selection::MaxDescendantCount);
        assert!("fastest".parse::<Allocation>().is_err());
        assert!("LET".parse::<Dispatch>().is_err());
    }

    #[test]
    fn discipline() {
        assert_eq!(Discipline::new("locking", None, None, None).unwrap(), Discipline::Locking);
        assert_eq!(Discipline::new("queueing", Some("LET"), Some("MNJ"), Some("MNAOT")).unwrap(),
                   Discipline::Queueing {
                       selection: Selection::LeastGpuTime,
                       placement: Placement::MinJobCount,
                       ordering: Selection::MaxDescendantCount,
                   });
        assert!(Discipline::new("queueing", Some("LET"), None, Some("MNAOT")).is_err());
        assert!(Discipline::new("stealing", None, None, None).is_err());
    }

    #[test]
    fn display() {
        let policy = Policy {
            allocation: Allocation::MinTotalQueuedExecTime,
            dispatch: Dispatch::MinExecTime,
            discipline: Discipline::Queueing {
                selection: Selection::WeightedSum,
                placement: Placement::MinJobCount,
                ordering: Selection::MaxDescendantCount,
            },
        };
        assert_eq!(policy.to_string(), "MTET-MET,WSM-MNJ-MNAOT");
    }
}
