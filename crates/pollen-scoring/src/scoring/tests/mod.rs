mod common;
mod routing;
mod weights;
