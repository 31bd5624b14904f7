use dialoguer::{Input, Select};

use monorail_plan::{
    PlanError, PromptProvider, Result, TextContract, TextInput, VersionChoice, VersionSelection,
};

/// [`PromptProvider`] backed by the terminal.
pub struct TerminalPromptProvider;

impl PromptProvider for TerminalPromptProvider {
    fn select_version(&self, message: &str, choices: &[VersionChoice]) -> Result<VersionSelection> {
        let items: Vec<String> = choices.iter().map(ToString::to_string).collect();

        let selection = Select::new()
            .with_prompt(message)
            .items(&items)
            .default(0)
            .interact_opt()
            .map_err(to_plan_error)?;

        match selection {
            Some(index) => Ok(VersionSelection::Selected(choices[index].clone())),
            None => Ok(VersionSelection::Cancelled),
        }
    }

    fn input_text(&self, message: &str, contract: &TextContract<'_>) -> Result<TextInput> {
        loop {
            let raw: String = Input::new()
                .with_prompt(message)
                .allow_empty(true)
                .interact_text()
                .map_err(to_plan_error)?;

            if raw.is_empty() {
                return Ok(TextInput::Cancelled);
            }

            let filtered = (contract.filter)(&raw);
            match (contract.validate)(&filtered) {
                Ok(()) => return Ok(TextInput::Provided(filtered)),
                Err(reason) => eprintln!("{reason}"),
            }
        }
    }
}

fn to_plan_error(e: dialoguer::Error) -> PlanError {
    match e {
        dialoguer::Error::IO(io_err) => PlanError::Prompt(io_err),
    }
}
