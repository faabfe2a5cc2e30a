/// Defines a function `$name` returning a new [`Command`] named `$name`.
///
/// [`Command`]: nokari_core::command::Command
#[macro_export]
macro_rules! command {
    (
        $name:ident
        $(, aliases: [$($alias:expr),* $(,)?])?
        $(, description: $description:expr)?
        $(, usage: $usage:expr)?
        $(, example: $example:expr)?
        $(, executor: $executor:expr)?
        $(,)?
    ) => {
        pub fn $name() -> ::nokari_core::command::Command {
            let mut cmd = ::nokari_core::command::Command::new(stringify!($name));

            $($(
                cmd.alias($alias);
            )*)?

            $(
                cmd.set_description($description);
            )?

            $(
                cmd.set_usage($usage);
            )?

            $(
                cmd.set_example($example);
            )?

            $(
                let executor = ::nokari_core::executor::Executor::from_fn($executor);
                cmd.executor(::std::option::Option::Some(executor));
            )?

            cmd
        }
    };
}
