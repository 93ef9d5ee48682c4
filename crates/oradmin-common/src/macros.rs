/// Macro to implement [`Envelope`](crate::Envelope) for a response that embeds
/// an [`Outcome`](crate::Outcome) or [`CommandStatus`](crate::CommandStatus).
///
/// # Usage
/// ```ignore
/// impl_envelope!(ResQueryPlan, outcome);
/// impl_envelope!(ResListarUsuarios, status);
/// ```
#[macro_export]
macro_rules! impl_envelope {
    ($ty:ty, $field:ident) => {
        impl $crate::Envelope for $ty {
            fn succeeded(&self) -> bool {
                $crate::Envelope::succeeded(&self.$field)
            }
        }
    };
}
