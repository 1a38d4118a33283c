mod end_to_end;
mod fault_injection;
