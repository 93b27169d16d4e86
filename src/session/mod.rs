pub(crate) mod animation;
