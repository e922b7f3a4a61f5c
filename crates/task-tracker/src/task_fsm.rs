//! Lifecycle of a tracked background task.
//!
//! ```text
//! Submitted ──Poll──► Polling ──Poll──► Polling
//!                        │
//!                        ├── Succeed ──► Succeeded
//!                        ├── Fail ─────► Failed
//!                        ├── Exhaust ──► Abandoned
//!                        └── LoseSession ──► SessionLost
//! ```
//!
//! The right-hand states are terminal: no input leaves them.

use rust_fsm::*;

state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub task_machine(Submitted)

    Submitted => {
        Poll => Polling
    },
    Polling => {
        Poll => Polling,
        Succeed => Succeeded,
        Fail => Failed,
        // Poll budget used up without a terminal status
        Exhaust => Abandoned,
        // Credentials rejected and the refresh could not recover them
        LoseSession => SessionLost
    }
}

pub use task_machine::Input as TaskMachineInput;
pub use task_machine::State as TaskMachineState;
pub use task_machine::StateMachine as TaskMachine;

impl TaskMachineState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskMachineState::Succeeded
                | TaskMachineState::Failed
                | TaskMachineState::Abandoned
                | TaskMachineState::SessionLost
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_submitted() {
        let machine = TaskMachine::new();
        assert_eq!(*machine.state(), TaskMachineState::Submitted);
    }

    #[test]
    fn test_poll_until_success() {
        let mut machine = TaskMachine::new();

        machine.consume(&TaskMachineInput::Poll).unwrap();
        machine.consume(&TaskMachineInput::Poll).unwrap();
        assert_eq!(*machine.state(), TaskMachineState::Polling);

        machine.consume(&TaskMachineInput::Succeed).unwrap();
        assert_eq!(*machine.state(), TaskMachineState::Succeeded);
        assert!(machine.state().is_terminal());
    }

    #[test]
    fn test_cannot_finish_before_first_poll() {
        let mut machine = TaskMachine::new();

        assert!(machine.consume(&TaskMachineInput::Succeed).is_err());
        assert!(machine.consume(&TaskMachineInput::Exhaust).is_err());
        assert_eq!(*machine.state(), TaskMachineState::Submitted);
    }

    #[test]
    fn test_terminal_states_are_final() {
        let mut machine = TaskMachine::new();
        machine.consume(&TaskMachineInput::Poll).unwrap();
        machine.consume(&TaskMachineInput::Exhaust).unwrap();
        assert_eq!(*machine.state(), TaskMachineState::Abandoned);

        assert!(machine.consume(&TaskMachineInput::Poll).is_err());
        assert!(machine.consume(&TaskMachineInput::Succeed).is_err());
    }

    #[test]
    fn test_session_lost_is_terminal() {
        let mut machine = TaskMachine::new();
        machine.consume(&TaskMachineInput::Poll).unwrap();
        machine.consume(&TaskMachineInput::LoseSession).unwrap();
        assert_eq!(*machine.state(), TaskMachineState::SessionLost);
        assert!(machine.state().is_terminal());
        assert!(machine.consume(&TaskMachineInput::Poll).is_err());
    }

    #[test]
    fn test_failure() {
        let mut machine = TaskMachine::new();
        machine.consume(&TaskMachineInput::Poll).unwrap();
        machine.consume(&TaskMachineInput::Fail).unwrap();
        assert_eq!(*machine.state(), TaskMachineState::Failed);
    }
}
