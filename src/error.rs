use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// This enum covers all possible error conditions that can occur during schema registration,
/// property access, dynamic property management, and persistence. Each variant provides specific
/// context about the failure mode to enable appropriate error handling.
///
/// # Error Categories
///
/// ## Schema Registration Errors
/// - [`Error::DuplicatePropertyName`] - Property name already declared in the registry
/// - [`Error::DuplicatePropertySlot`] - Slot index already occupied in the registry
/// - [`Error::SlotOutOfRange`] - Slot index outside the signed 16-bit range
/// - [`Error::ClassNotRegistered`] - Parent class looked up before its registration
///
/// ## Property Access Errors
/// - [`Error::PropertyNotFound`] - Named property absent from both schema and dynamic store
/// - [`Error::TypeMismatch`] - Value of the wrong kind assigned to a property
/// - [`Error::UnknownPropertyType`] - Dynamic property creation with an unknown type name
///
/// ## Persistence Errors
/// - [`Error::Malformed`] - Corrupted or invalid property stream
/// - [`Error::Xml`] - XML syntax errors from the quick-xml crate
/// - [`Error::Io`] - Filesystem I/O errors
///
/// # Examples
///
/// ```rust
/// use propscope::{Error, PropertyKind, SchemaRegistry};
///
/// let result = SchemaRegistry::build("Part", None, |b| {
///     b.property("Length", 8, PropertyKind::Float);
///     b.property("Length", 12, PropertyKind::Float);
/// });
///
/// match result {
///     Err(Error::DuplicatePropertyName { class, name }) => {
///         eprintln!("{} declares {} twice", class, name);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
///     Ok(_) => unreachable!(),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    // Schema registration errors
    /// A property name was declared twice within one registry.
    ///
    /// Property names must be unique within a class's registry, including
    /// after merging with the ancestor chain. At class-initialization time
    /// this is a programmer error and callers may legitimately abort on it;
    /// from the dynamic-property surface it is a recoverable runtime result.
    #[error("Class '{class}' already declares a property named '{name}'")]
    DuplicatePropertyName {
        /// The class whose registry rejected the declaration
        class: String,
        /// The colliding property name
        name: String,
    },

    /// A slot index was declared twice within one registry.
    ///
    /// Slots identify a property's position across every instance of a class
    /// and therefore must be unique per registry.
    #[error("Class '{class}' already declares slot {slot} (while adding '{name}')")]
    DuplicatePropertySlot {
        /// The class whose registry rejected the declaration
        class: String,
        /// The property whose declaration collided
        name: String,
        /// The colliding slot index
        slot: i16,
    },

    /// A slot index fell outside the signed 16-bit range.
    ///
    /// Slot indices are stored as 16-bit signed integers; a declaration
    /// outside `0..=i16::MAX` cannot be registered and is rejected at
    /// class-initialization time.
    #[error("Slot {slot} for property '{name}' is outside the 16-bit signed range")]
    SlotOutOfRange {
        /// The property whose declaration was rejected
        name: String,
        /// The out-of-range raw slot value
        slot: i32,
    },

    /// A class registration referenced a parent that has not been registered.
    ///
    /// Parent classes must be registered before their subclasses so the
    /// schema chain can be linked at registration time.
    #[error("Class '{0}' is not registered")]
    ClassNotRegistered(String),

    // Property access errors
    /// A named property was not found on the container.
    ///
    /// Returned by operations that require the property to exist, such as
    /// value mutation. Plain lookups report absence as `None` instead,
    /// because absence is a routine outcome for optional properties.
    #[error("Property '{0}' was not found")]
    PropertyNotFound(String),

    /// A value of the wrong kind was assigned to a property.
    ///
    /// Properties are strictly typed by their declared [`crate::PropertyKind`];
    /// assignment never coerces between kinds.
    #[error("Expected a value of kind {expected}, got {actual}")]
    TypeMismatch {
        /// The property's declared kind name
        expected: &'static str,
        /// The kind name of the rejected value
        actual: &'static str,
    },

    /// A dynamic property was requested with an unknown type name.
    ///
    /// Type names follow the `Property<Kind>` convention, e.g.
    /// `PropertyFloat` or `PropertyString`.
    #[error("Unknown property type name '{0}'")]
    UnknownPropertyType(String),

    // Persistence errors
    /// The property stream is damaged and could not be restored.
    ///
    /// This error indicates that the persisted property document does not
    /// conform to the expected structure. The error includes the source
    /// location where the malformation was detected for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Error from the quick-xml crate while reading or writing a stream.
    #[error("{0}")]
    Xml(#[from] quick_xml::Error),

    /// File I/O error.
    ///
    /// Wraps standard I/O errors that can occur while writing or reading
    /// property documents.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Failed to lock target.
    ///
    /// This error occurs when thread synchronization fails, typically
    /// when trying to acquire a lock that is in an invalid state.
    #[error("Failed to lock target")]
    LockError,
}
