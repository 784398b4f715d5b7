use std::any::Any;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	/// The var was read again from inside its own binding.
	#[error("var `{name}` was read while it was being evaluated")]
	Cycle { name: &'static str },

	/// The binding of the var, or of one of its dependencies, panicked.
	#[error("evaluation of var `{name}` panicked: {message}")]
	Panicked { name: &'static str, message: String },
}

impl Error {
	pub(crate) fn panicked(name: &'static str, payload: Box<dyn Any + Send>) -> Self {
		let message = match payload.downcast::<String>() {
			Ok(message) => *message,
			Err(payload) => match payload.downcast::<&'static str>() {
				Ok(message) => (*message).to_owned(),
				Err(_) => String::from("<non-string panic payload>"),
			},
		};

		Error::Panicked { name, message }
	}
}
