use kernel::KernelError;

/// Maps a backend error onto the kernel error it stands for.
pub(crate) trait ConvertError {
    type Ok;
    fn convert_error(self) -> error_stack::Result<Self::Ok, KernelError>;
}
