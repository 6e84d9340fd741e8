mod diff;
mod history;
mod publish;
mod report;
mod revisions;
mod snapshot;
mod version_spec;

pub use self::{
    diff::*, history::*, publish::*, report::*, revisions::*, snapshot::*, version_spec::*,
};
